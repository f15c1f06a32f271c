//! The open, self-extending HTTP method registry.
//!
//! HTTP doesn't have a closed set of verbs: WebDAV and vendor extensions add their own. Instead of
//! an enum with an `Extension` variant, every method token is interned in a registry that only
//! grows. Parsing never fails: an unknown token is registered on first sight and every later
//! lookup of the same name, ignoring case, returns the identical [`Method`] instance.
//!
//! Because the registry never shrinks, a peer that sends many distinct tokens makes it grow
//! without bound. New registrations are logged at `debug` level so this stays observable.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, trace};
use triomphe::Arc;

#[derive(Debug)]
struct MethodInfo {
    name: Box<str>,
    safe: bool,
    idempotent: bool,
    description: Box<str>,
}

/// An interned HTTP method.
///
/// Cloning is cheap. Two methods are equal only if they are the same registry instance, which
/// for one registry means the same name ignoring case.
#[derive(Clone)]
pub struct Method {
    inner: Arc<MethodInfo>,
}

impl Method {
    fn new(name: &str, safe: bool, idempotent: bool, description: &str) -> Self {
        Self { inner: Arc::new(MethodInfo { name: name.into(), safe, idempotent, description: description.into() }) }
    }

    /// Resolves `name` in the global registry, registering it if it is unknown.
    #[inline]
    pub fn parse(name: &str) -> Self {
        MethodRegistry::global().parse(name)
    }

    /// Registers `name` in the global registry with explicit flags.
    ///
    /// If the name is already known the existing instance is returned unchanged.
    #[inline]
    pub fn register(name: &str, safe: bool, idempotent: bool, description: &str) -> Self {
        MethodRegistry::global().register(name, safe, idempotent, description)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner.name
    }

    /// Safe methods don't request a state change on the origin server.
    #[inline]
    pub fn is_safe(&self) -> bool {
        self.inner.safe
    }

    #[inline]
    pub fn is_idempotent(&self) -> bool {
        self.inner.idempotent
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// True if both handles point to the same interned instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.as_str())
            .field("safe", &self.is_safe())
            .field("idempotent", &self.is_idempotent())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        Method::parse(name)
    }
}

/// `(name, safe, idempotent, description)` of the methods every registry starts with.
const WELL_KNOWN: &[(&str, bool, bool, &str)] = &[
    ("GET", true, true, "transfer a current representation of the target resource"),
    ("HEAD", true, true, "same as GET, but do not transfer the response content"),
    ("POST", false, false, "perform resource-specific processing on the request content"),
    ("PUT", false, true, "replace all current representations of the target resource"),
    ("DELETE", false, true, "remove all current representations of the target resource"),
    ("CONNECT", false, false, "establish a tunnel to the server identified by the target resource"),
    ("OPTIONS", true, true, "describe the communication options for the target resource"),
    ("TRACE", true, true, "perform a message loop-back test along the path to the target resource"),
    ("PATCH", false, false, "apply partial modifications to a resource"),
    ("PROPFIND", true, true, "retrieve properties defined on the resource"),
    ("PROPPATCH", false, true, "set and/or remove properties defined on the resource"),
    ("MKCOL", false, true, "create a new collection resource"),
    ("COPY", false, true, "create a duplicate of the source resource"),
    ("MOVE", false, true, "move the source resource to the destination"),
    ("LOCK", false, false, "take out a lock of any access type on the resource"),
    ("UNLOCK", false, true, "remove the lock identified by the lock token"),
];

/// A case-insensitive interning table from method token to [`Method`].
///
/// Lookups and inserts share one mutex; once the common verbs are warmed the lock is held only
/// for a hash lookup.
pub struct MethodRegistry {
    methods: Mutex<HashMap<String, Method>>,
}

static GLOBAL_REGISTRY: Lazy<MethodRegistry> = Lazy::new(MethodRegistry::new);

impl MethodRegistry {
    /// Creates a registry seeded with the standard and WebDAV methods.
    pub fn new() -> Self {
        let methods = WELL_KNOWN
            .iter()
            .map(|&(name, safe, idempotent, description)| (name.to_owned(), Method::new(name, safe, idempotent, description)))
            .collect();
        Self { methods: Mutex::new(methods) }
    }

    /// The process wide registry used by [`Method::parse`] and request parsing.
    pub fn global() -> &'static MethodRegistry {
        &GLOBAL_REGISTRY
    }

    /// Resolves `name`, registering it as neither safe nor idempotent if it is unknown.
    pub fn parse(&self, name: &str) -> Method {
        self.register(name, false, false, "")
    }

    /// Resolves `name`, registering it with the given flags if it is unknown.
    ///
    /// A name that isn't a token (empty, or containing whitespace or control bytes) is never
    /// registered: the returned method is a detached instance that no lookup finds.
    pub fn register(&self, name: &str, safe: bool, idempotent: bool, description: &str) -> Method {
        if !is_token(name) {
            trace!(method = name, "not a method token, skip registration");
            return Method::new(name, safe, idempotent, description);
        }

        let key = name.to_ascii_uppercase();
        // the map is always left consistent, so a poisoned lock is still usable
        let mut methods = self.methods.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(method) = methods.get(&key) {
            return method.clone();
        }

        debug!(method = name, registered = methods.len() + 1, "register new http method");
        let method = Method::new(name, safe, idempotent, description);
        methods.insert(key, method.clone());
        method
    }

    /// Looks up `name` without registering it.
    pub fn get(&self, name: &str) -> Option<Method> {
        let methods = self.methods.lock().unwrap_or_else(PoisonError::into_inner);
        methods.get(&name.to_ascii_uppercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.methods.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_token(name: &str) -> bool {
    !name.is_empty() && !name.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry").field("len", &self.len()).finish()
    }
}

macro_rules! well_known_method {
    ($method:ident, $static_name:ident, $name:literal) => {
        static $static_name: Lazy<Method> = Lazy::new(|| Method::parse($name));

        impl Method {
            #[doc = concat!("The interned `", $name, "` method.")]
            #[inline]
            pub fn $method() -> Method {
                $static_name.clone()
            }
        }
    };
}

well_known_method!(get, GET, "GET");
well_known_method!(head, HEAD, "HEAD");
well_known_method!(post, POST, "POST");
well_known_method!(put, PUT, "PUT");
well_known_method!(delete, DELETE, "DELETE");
well_known_method!(connect, CONNECT, "CONNECT");
well_known_method!(options, OPTIONS, "OPTIONS");
well_known_method!(trace, TRACE, "TRACE");
well_known_method!(patch, PATCH, "PATCH");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_are_seeded() {
        let get = Method::parse("GET");
        assert!(get.is_safe());
        assert!(get.is_idempotent());
        assert_eq!(get, Method::get());

        let post = Method::post();
        assert!(!post.is_safe());
        assert!(!post.is_idempotent());

        assert!(Method::parse("propfind").is_safe());
    }

    #[test]
    fn parse_is_case_insensitive() {
        let lower = Method::parse("get");
        assert!(lower.ptr_eq(&Method::get()));
        assert_eq!(lower.as_str(), "GET");
    }

    #[test]
    fn unknown_methods_are_registered_once() {
        let registry = MethodRegistry::new();
        let before = registry.len();
        assert!(registry.get("WIBBLE").is_none());

        let first = registry.parse("WIBBLE");
        let second = registry.parse("wibble");

        assert!(first.ptr_eq(&second));
        assert_eq!(registry.len(), before + 1);
        assert!(!first.is_safe());
        assert!(!first.is_idempotent());
        assert_eq!(first.as_str(), "WIBBLE");
    }

    #[test]
    fn register_keeps_first_definition() {
        let registry = MethodRegistry::new();
        let purge = registry.register("PURGE", false, true, "drop cached copies");
        let again = registry.register("PURGE", true, false, "");

        assert!(purge.ptr_eq(&again));
        assert!(again.is_idempotent());
        assert!(!again.is_safe());
        assert_eq!(again.description(), "drop cached copies");
    }

    #[test]
    fn non_tokens_are_not_registered() {
        let registry = MethodRegistry::new();
        let before = registry.len();

        let empty = registry.parse("");
        let spaced = registry.parse("BAD VERB");

        assert_eq!(empty.as_str(), "");
        assert_eq!(spaced.as_str(), "BAD VERB");
        assert!(!empty.ptr_eq(&registry.parse("")));
        assert!(registry.get("").is_none());
        assert!(registry.get("bad verb").is_none());
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn separate_registries_intern_separately() {
        let a = MethodRegistry::new().parse("GET");
        let b = MethodRegistry::new().parse("GET");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn concurrent_registration_yields_one_instance() {
        let registry = std::sync::Arc::new(MethodRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || registry.parse("SUBSCRIBE"))
            })
            .collect();

        let methods: Vec<Method> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert!(methods.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
    }
}
