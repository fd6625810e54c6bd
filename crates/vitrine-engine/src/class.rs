//! Per-type callback chains.
//!
//! A [`ClassPresenter`] owns two kinds of callbacks:
//! - **base** callbacks, folded over the initial accumulator on every call;
//! - **inclusion** callbacks, keyed by a single path segment and folded only
//!   when a caller asks for that inclusion.
//!
//! ```text
//! present(post, ["author.profile", "comments"], Null)
//!   base:     f(post, Null, [author.profile, comments]) -> r1
//!             g(post, r1,   [author.profile, comments]) -> r2
//!   author:   a(post, r2,   [profile])                  -> r3
//!   comments: c(post, r3,   [])                         -> r4
//! ```

use indexmap::IndexMap;
use std::fmt;
use std::sync::{
    Arc, Condvar, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::thread::{self, ThreadId};

use crate::Registry;
use vitrine_types::{Result, TypeTag, Value};

/// Presentation callback: `(subject, accumulated, inclusions, registry) -> accumulated`
///
/// Base callbacks receive the full requested inclusion list; inclusion
/// callbacks receive only the remainders of their own branch.
pub type PresentFn =
    Arc<dyn Fn(&Value, Value, &[String], &Registry) -> Result<Value> + Send + Sync>;

#[derive(Default)]
struct Chains {
    uses: Vec<PresentFn>,
    with: IndexMap<String, Vec<PresentFn>>,
}

pub struct ClassPresenter {
    tag: TypeTag,
    chains: RwLock<Chains>,
    /// Thread running this presenter's resolvers, if they are still running
    warmup: Mutex<Option<ThreadId>>,
    ready: Condvar,
}

impl ClassPresenter {
    pub(crate) fn new(tag: TypeTag) -> Self {
        Self::with_warmup(tag, None)
    }

    /// Presenter whose resolvers are about to run on the current thread.
    pub(crate) fn warming(tag: TypeTag) -> Self {
        Self::with_warmup(tag, Some(thread::current().id()))
    }

    fn with_warmup(tag: TypeTag, owner: Option<ThreadId>) -> Self {
        Self {
            tag,
            chains: RwLock::new(Chains::default()),
            warmup: Mutex::new(owner),
            ready: Condvar::new(),
        }
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    /// Append a base callback.
    pub fn using<F>(&self, callback: F) -> &Self
    where
        F: Fn(&Value, Value, &[String], &Registry) -> Result<Value> + Send + Sync + 'static,
    {
        self.write().uses.push(Arc::new(callback));
        self
    }

    /// Append a callback to the inclusion chain named `name`.
    ///
    /// The name is stored as given. Requests are split on `.` before lookup,
    /// so a dotted name here can never be selected.
    pub fn with<F>(&self, name: impl Into<String>, callback: F) -> &Self
    where
        F: Fn(&Value, Value, &[String], &Registry) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.contains('.') {
            tracing::debug!(
                tag = %self.tag,
                inclusion = %name,
                "dotted inclusion name registered; requests are split on '.' and will not match it"
            );
        }
        self.write()
            .with
            .entry(name)
            .or_default()
            .push(Arc::new(callback));
        self
    }

    /// True when no base callbacks are registered; such a presenter hands
    /// every subject back unchanged.
    pub fn is_transparent(&self) -> bool {
        self.read().uses.is_empty()
    }

    /// Inclusion names in registration order
    pub fn inclusion_names(&self) -> Vec<String> {
        self.read().with.keys().cloned().collect()
    }

    /// Run the base chain, then every requested inclusion chain.
    pub fn present(
        &self,
        subject: &Value,
        requested: &[String],
        initial: Value,
        registry: &Registry,
    ) -> Result<Value> {
        // Snapshot so callbacks can register more callbacks on this presenter.
        let uses = self.read().uses.clone();
        if uses.is_empty() {
            return Ok(subject.clone());
        }

        let mut result = fold(&uses, subject, initial, requested, registry)?;

        for (name, remainders) in normalize_with(requested) {
            let chain = self.read().with.get(&name).cloned();
            if let Some(chain) = chain {
                tracing::trace!(tag = %self.tag, inclusion = %name, ?remainders, "presenting inclusion");
                result = fold(&chain, subject, result, &remainders, registry)?;
            }
        }

        Ok(result)
    }

    /// Block until resolvers running on another thread have finished.
    ///
    /// Returns at once on the thread running them, so a resolver can look up
    /// its own presenter.
    pub(crate) fn wait_ready(&self) {
        let me = thread::current().id();
        let mut owner = self.warmup.lock().unwrap_or_else(PoisonError::into_inner);
        while owner.is_some_and(|id| id != me) {
            tracing::trace!(tag = %self.tag, "waiting for presenter resolvers");
            owner = self
                .ready
                .wait(owner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark resolvers as finished and wake every waiting thread.
    pub(crate) fn finish_warmup(&self) {
        *self.warmup.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.ready.notify_all();
    }

    fn read(&self) -> RwLockReadGuard<'_, Chains> {
        self.chains.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Chains> {
        self.chains.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ClassPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chains = self.read();
        f.debug_struct("ClassPresenter")
            .field("tag", &self.tag)
            .field("uses", &chains.uses.len())
            .field("with", &chains.with.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn fold(
    chain: &[PresentFn],
    subject: &Value,
    initial: Value,
    inclusions: &[String],
    registry: &Registry,
) -> Result<Value> {
    chain.iter().try_fold(initial, |result, callback| {
        callback(subject, result, inclusions, registry)
    })
}

/// Split inclusion paths one level deep.
///
/// Each path is split on its first `.`; the head becomes a key and the tail
/// (if any) is appended to that key's remainders. Keys keep the order in
/// which they first appear.
///
/// ```
/// use vitrine_engine::normalize_with;
///
/// let normalized = normalize_with(&["a.b", "c", "a.d"]);
/// assert_eq!(normalized["a"], ["b", "d"]);
/// assert!(normalized["c"].is_empty());
/// assert_eq!(normalized.keys().collect::<Vec<_>>(), ["a", "c"]);
/// ```
pub fn normalize_with<S: AsRef<str>>(requested: &[S]) -> IndexMap<String, Vec<String>> {
    let mut normalized: IndexMap<String, Vec<String>> = IndexMap::new();

    for path in requested {
        let path = path.as_ref();
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };

        let remainders = normalized.entry(head.to_string()).or_default();
        if let Some(tail) = tail {
            remainders.push(tail.to_string());
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(n: i64) -> impl Fn(&Value, Value, &[String], &Registry) -> Result<Value> {
        move |_, acc, _, _| Ok(Value::from(acc.as_i64().unwrap_or(0) + n))
    }

    #[test]
    fn test_normalize_splits_on_first_dot_only() {
        let normalized = normalize_with(&["a.b.c"]);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["a"], ["b.c"]);
    }

    #[test]
    fn test_normalize_merges_repeated_heads() {
        let normalized = normalize_with(&["x", "x.y"]);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["x"], ["y"]);
    }

    #[test]
    fn test_normalize_keeps_first_seen_order() {
        let normalized = normalize_with(&["c", "a.b", "c.d", "b"]);
        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert_eq!(normalized["c"], ["d"]);
    }

    #[test]
    fn test_normalize_trailing_dot_keeps_empty_remainder() {
        let normalized = normalize_with(&["a."]);
        assert_eq!(normalized["a"], [""]);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_with::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_transparent_presenter_returns_subject() {
        let registry = Registry::new();
        let presenter = ClassPresenter::new(TypeTag::new("t"));
        presenter.with("x", add(100));

        let subject = Value::from("subject");
        let presented = presenter
            .present(&subject, &["x".to_string()], Value::from(0), &registry)
            .unwrap();

        assert!(presenter.is_transparent());
        assert_eq!(presented, subject);
    }

    #[test]
    fn test_inclusions_fold_after_base_chain() {
        let registry = Registry::new();
        let presenter = ClassPresenter::new(TypeTag::new("t"));
        presenter
            .using(add(1))
            .with("x", |_, acc, _, _| {
                Ok(Value::from(acc.as_i64().unwrap_or(0) * 10))
            })
            .using(add(2));

        let presented = presenter
            .present(&Value::Null, &["x".to_string()], Value::from(0), &registry)
            .unwrap();

        assert_eq!(presented.as_i64(), Some(30));
    }

    #[test]
    fn test_dotted_registration_never_matches() {
        let registry = Registry::new();
        let presenter = ClassPresenter::new(TypeTag::new("t"));
        presenter
            .using(add(1))
            .with("a.b", add(100));

        let presented = presenter
            .present(&Value::Null, &["a.b".to_string()], Value::from(0), &registry)
            .unwrap();

        assert_eq!(presented.as_i64(), Some(1));
        assert_eq!(presenter.inclusion_names(), ["a.b"]);
    }

    #[test]
    fn test_warmup_owner_is_not_blocked() {
        let presenter = ClassPresenter::warming(TypeTag::new("t"));
        presenter.wait_ready();
        presenter.finish_warmup();
        presenter.wait_ready();
    }

    #[test]
    fn test_finish_warmup_releases_other_threads() {
        let presenter = ClassPresenter::warming(TypeTag::new("t"));

        thread::scope(|scope| {
            let waiter = scope.spawn(|| {
                presenter.wait_ready();
                presenter.is_transparent()
            });
            presenter.using(add(1));
            presenter.finish_warmup();
            assert!(!waiter.join().unwrap());
        });
    }

    #[test]
    fn test_debug_lists_inclusions() {
        let presenter = ClassPresenter::new(TypeTag::new("t"));
        presenter.using(add(1)).with("author", add(1));

        let debug = format!("{:?}", presenter);
        assert!(debug.contains("uses: 1"));
        assert!(debug.contains("author"));
    }
}
