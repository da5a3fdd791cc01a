use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use realizer::{ElementFactory, OwnerId};

use crate::ElementKind;
use crate::key::KindMap;

/// An element handed out by a [`KindedFactory`], tagged with the kind it was built as.
#[derive(Clone, Debug, PartialEq)]
pub struct Pooled<K, E> {
    pub kind: K,
    /// The index the element is currently bound to.
    pub index: usize,
    /// The engine that requested the element.
    pub owner: OwnerId,
    pub element: E,
}

/// Counters kept by a [`KindedFactory`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    pub created: usize,
    pub reused: usize,
    pub recycled: usize,
    /// Recycled elements dropped because their kind's pool was full.
    pub discarded: usize,
}

type Classify<T, K> = Box<dyn Fn(&T, usize) -> K>;
type Build<E> = Box<dyn FnMut() -> E>;
type Bind<T, E> = Box<dyn FnMut(&mut E, &T, usize)>;
type Hook<E> = Box<dyn FnMut(&mut E)>;

/// An [`ElementFactory`] that keeps one recycle pool per element kind.
///
/// Every kind the classifier can produce must be registered with [`Self::with_kind`] before the
/// factory is used. A recycled element only ever goes back to the pool of the kind it was built
/// as, so an element is never rebound to an item of a different kind.
///
/// Wrap it in `Rc<RefCell<_>>` to share the pools between engines.
pub struct KindedFactory<T, K, E> {
    classify: Classify<T, K>,
    bind: Bind<T, E>,
    builders: KindMap<K, Build<E>>,
    pools: KindMap<K, Vec<E>>,
    unbind: Option<Hook<E>>,
    clear_focus: Option<Hook<E>>,
    max_pooled_per_kind: Option<usize>,
    stats: PoolStats,
}

impl<T, K: ElementKind, E> KindedFactory<T, K, E> {
    /// `classify` picks the kind for an item; `bind` prepares an element (new or reused) for the
    /// item it is handed out for.
    pub fn new(
        classify: impl Fn(&T, usize) -> K + 'static,
        bind: impl FnMut(&mut E, &T, usize) + 'static,
    ) -> Self {
        Self {
            classify: Box::new(classify),
            bind: Box::new(bind),
            builders: KindMap::new(),
            pools: KindMap::new(),
            unbind: None,
            clear_focus: None,
            max_pooled_per_kind: None,
            stats: PoolStats::default(),
        }
    }

    /// Registers how to build a fresh element of `kind`.
    pub fn with_kind(mut self, kind: K, build: impl FnMut() -> E + 'static) -> Self {
        self.builders.insert(kind, Box::new(build));
        self
    }

    /// Runs on every element as it enters the pool.
    pub fn with_unbind(mut self, unbind: impl FnMut(&mut E) + 'static) -> Self {
        self.unbind = Some(Box::new(unbind));
        self
    }

    /// Runs on a focused element whose item is being removed.
    pub fn with_clear_focus(mut self, clear_focus: impl FnMut(&mut E) + 'static) -> Self {
        self.clear_focus = Some(Box::new(clear_focus));
        self
    }

    /// Caps how many idle elements are kept per kind. Extra recycled elements are dropped.
    pub fn with_max_pooled_per_kind(mut self, max: usize) -> Self {
        self.max_pooled_per_kind = Some(max);
        self
    }

    pub fn is_registered(&self, kind: &K) -> bool {
        self.builders.contains_key(kind)
    }

    /// Number of idle elements of `kind`.
    pub fn pooled(&self, kind: &K) -> usize {
        self.pools.get(kind).map_or(0, Vec::len)
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Drops every idle element.
    pub fn clear(&mut self) {
        self.pools.clear();
    }
}

impl<T, K: ElementKind, E> ElementFactory<T> for KindedFactory<T, K, E> {
    type Element = Pooled<K, E>;

    fn get_or_create(&mut self, item: &T, index: usize, owner: OwnerId) -> Pooled<K, E> {
        let kind = (self.classify)(item, index);
        let mut element = match self.pools.get_mut(&kind).and_then(Vec::pop) {
            Some(element) => {
                self.stats.reused += 1;
                element
            }
            None => {
                let Some(build) = self.builders.get_mut(&kind) else {
                    panic!("KindedFactory: item {index} classified into an unregistered kind");
                };
                self.stats.created += 1;
                build()
            }
        };
        (self.bind)(&mut element, item, index);
        Pooled {
            kind,
            index,
            owner,
            element,
        }
    }

    fn recycle(&mut self, pooled: Pooled<K, E>) {
        let Pooled {
            kind, mut element, ..
        } = pooled;
        if let Some(unbind) = self.unbind.as_mut() {
            unbind(&mut element);
        }
        let pool = self.pools.entry(kind).or_default();
        if self.max_pooled_per_kind.is_some_and(|max| pool.len() >= max) {
            atrace!(pooled = pool.len(), "pool full, dropping recycled element");
            self.stats.discarded += 1;
            return;
        }
        pool.push(element);
        self.stats.recycled += 1;
    }

    fn update_index(&mut self, pooled: &mut Pooled<K, E>, _old_index: usize, new_index: usize) {
        pooled.index = new_index;
    }

    fn clear_focus(&mut self, pooled: &mut Pooled<K, E>) {
        if let Some(clear_focus) = self.clear_focus.as_mut() {
            clear_focus(&mut pooled.element);
        }
    }
}

impl<T, K, E> fmt::Debug for KindedFactory<T, K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindedFactory")
            .field("kinds", &self.builders.len())
            .field("max_pooled_per_kind", &self.max_pooled_per_kind)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
