//! Presenter registry.
//!
//! Maps type tags to [`ClassPresenter`]s and drives presentation over
//! containers. Three tables back it, all append-only:
//! - presenters: tag -> class presenter, created on first reference;
//! - resolvers: tag -> deferred setup callbacks, consumed on first resolve;
//! - aliases: alias -> canonical tag, always a single hop.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ClassPresenter;
use vitrine_types::{Inclusions, Result, Tagged, TypeTag, Value};

/// Deferred setup callback, run once against a fresh class presenter
pub type ResolverFn = Arc<dyn Fn(&ClassPresenter, &Registry) -> Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Present list and map elements with the parent's inclusions and
    /// default. When false, elements get no inclusions and a `Null` default.
    pub propagate_to_elements: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            propagate_to_elements: true,
        }
    }
}

#[derive(Default)]
struct Tables {
    presenters: HashMap<TypeTag, Arc<ClassPresenter>>,
    resolvers: HashMap<TypeTag, Vec<ResolverFn>>,
    aliases: HashMap<TypeTag, TypeTag>,
}

#[derive(Default)]
pub struct Registry {
    options: RegistryOptions,
    tables: RwLock<Tables>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            tables: RwLock::default(),
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Queue a setup callback for `tag`, run the first time `tag` resolves.
    pub fn add_resolver<F>(&self, tag: impl Into<TypeTag>, callback: F) -> &Self
    where
        F: Fn(&ClassPresenter, &Registry) -> Result<()> + Send + Sync + 'static,
    {
        self.add_resolver_with_aliases(tag, callback, Vec::<TypeTag>::new())
    }

    /// Queue a setup callback and point every alias at `tag`.
    pub fn add_resolver_with_aliases<F, I>(
        &self,
        tag: impl Into<TypeTag>,
        callback: F,
        aliases: I,
    ) -> &Self
    where
        F: Fn(&ClassPresenter, &Registry) -> Result<()> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<TypeTag>,
    {
        let tag = tag.into();
        self.write()
            .resolvers
            .entry(tag.clone())
            .or_default()
            .push(Arc::new(callback));
        self.aliases(tag, aliases)
    }

    /// Point each alias at `tag`, replacing earlier targets.
    ///
    /// If `tag` is itself an alias its canonical target is stored instead,
    /// so every lookup is a single hop.
    pub fn aliases<I>(&self, tag: impl Into<TypeTag>, aliases: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<TypeTag>,
    {
        let tag = tag.into();
        let mut tables = self.write();
        let target = tables.aliases.get(&tag).cloned().unwrap_or(tag);
        for alias in aliases {
            tables.aliases.insert(alias.into(), target.clone());
        }
        drop(tables);
        self
    }

    /// Class presenter for `tag`, created empty if absent.
    pub fn presenter(&self, tag: impl Into<TypeTag>) -> Arc<ClassPresenter> {
        let tag = tag.into();
        if let Some(presenter) = self.read().presenters.get(&tag) {
            return presenter.clone();
        }
        self.write()
            .presenters
            .entry(tag.clone())
            .or_insert_with(|| Arc::new(ClassPresenter::new(tag)))
            .clone()
    }

    /// Class presenter for `tag` with `callback` appended as a base callback.
    pub fn presenter_with<F>(&self, tag: impl Into<TypeTag>, callback: F) -> Arc<ClassPresenter>
    where
        F: Fn(&Value, Value, &[String], &Registry) -> Result<Value> + Send + Sync + 'static,
    {
        let presenter = self.presenter(tag);
        presenter.using(callback);
        presenter
    }

    pub fn presenter_for<T: Tagged>(&self) -> Arc<ClassPresenter> {
        self.presenter(TypeTag::of::<T>())
    }

    /// Alias target of `tag`, or `tag` itself.
    pub fn canonical(&self, tag: impl Into<TypeTag>) -> TypeTag {
        let tag = tag.into();
        match self.read().aliases.get(&tag) {
            Some(target) => {
                tracing::trace!(alias = %tag, target = %target, "alias resolved");
                target.clone()
            }
            None => tag,
        }
    }

    pub fn has_presenter(&self, tag: impl Into<TypeTag>) -> bool {
        let tag = self.canonical(tag);
        self.read().presenters.contains_key(&tag)
    }

    /// Resolver callbacks registered for `tag` that have not run yet.
    pub fn pending_resolvers(&self, tag: impl Into<TypeTag>) -> usize {
        let tag = self.canonical(tag);
        self.read().resolvers.get(&tag).map_or(0, Vec::len)
    }

    /// Find the class presenter for `tag`, running its resolvers on first use.
    ///
    /// An existing presenter wins over pending resolvers. Resolvers are taken
    /// out of the table before they run, so they run at most once even if
    /// one of them fails or resolves the same tag again. Other threads
    /// resolving the tag meanwhile wait until the resolvers are done.
    pub fn resolve(&self, tag: impl Into<TypeTag>) -> Result<Option<Arc<ClassPresenter>>> {
        let tag = self.canonical(tag);

        let cached = self.read().presenters.get(&tag).cloned();
        if let Some(presenter) = cached {
            presenter.wait_ready();
            return Ok(Some(presenter));
        }

        let (presenter, resolvers) = {
            let mut tables = self.write();
            if let Some(presenter) = tables.presenters.get(&tag).cloned() {
                drop(tables);
                presenter.wait_ready();
                return Ok(Some(presenter));
            }
            let Some(resolvers) = tables.resolvers.remove(&tag) else {
                return Ok(None);
            };
            let presenter = Arc::new(ClassPresenter::warming(tag.clone()));
            tables.presenters.insert(tag.clone(), presenter.clone());
            (presenter, resolvers)
        };

        let _warmup = Warmup(presenter.clone());
        tracing::debug!(tag = %tag, count = resolvers.len(), "running presenter resolvers");
        for resolver in &resolvers {
            resolver(&presenter, self)?;
        }

        Ok(Some(presenter))
    }

    /// Present `value`.
    ///
    /// Lists and maps keep their shape and have each element presented.
    /// Scalars come back unchanged. Objects go through the class presenter of
    /// their type tag, or come back unchanged when there is none.
    pub fn present(
        &self,
        value: Value,
        with: impl Into<Inclusions>,
        default: Value,
    ) -> Result<Value> {
        let with = with.into();
        self.present_value(value, &with, &default)
    }

    /// Present `value` and convert the result to plain JSON.
    pub fn present_json(
        &self,
        value: Value,
        with: impl Into<Inclusions>,
        default: Value,
    ) -> Result<serde_json::Value> {
        self.present(value, with, default)?.to_json()
    }

    fn present_value(&self, value: Value, with: &[String], default: &Value) -> Result<Value> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| self.present_element(item, with, default))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| -> Result<(String, Value)> {
                    Ok((key, self.present_element(item, with, default)?))
                })
                .collect::<Result<IndexMap<_, _>>>()
                .map(Value::Map),
            Value::Object(object) => {
                let tag = object.type_tag();
                let value = Value::Object(object);
                tracing::trace!(tag = %tag, ?with, "presenting object");
                match self.resolve(tag)? {
                    Some(presenter) => presenter.present(&value, with, default.clone(), self),
                    None => Ok(value),
                }
            }
            scalar => Ok(scalar),
        }
    }

    fn present_element(&self, item: Value, with: &[String], default: &Value) -> Result<Value> {
        if self.options.propagate_to_elements {
            self.present_value(item, with, default)
        } else {
            self.present_value(item, &[], &Value::Null)
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases threads waiting on a presenter once its resolvers return or fail.
struct Warmup(Arc<ClassPresenter>);

impl Drop for Warmup {
    fn drop(&mut self) {
        self.0.finish_warmup();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.read();
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("presenters", &tables.presenters.len())
            .field("resolvers", &tables.resolvers.len())
            .field("aliases", &tables.aliases)
            .finish()
    }
}
