//! Candidate objects: named members resolved through a delegation chain.
//!
//! A candidate is anything that can answer "what does `name` resolve to?"
//! after walking its own members and then whatever it delegates to. The
//! [`Candidate`] trait is that question; [`Object`] and [`Prototype`] are
//! the built-in answers.
//!
//! Rust callables cannot be asked how many formal parameters they were
//! declared with, so every [`Callable`] carries its declared arity
//! explicitly. That number is what conformance checks compare against.
//!
//! ```text
//! Object ── own members ──▶ Prototype ── own members ──▶ Prototype ─▶ …
//!            (closest definition wins)
//! ```

use crate::error::{CallError, ObjectError};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type CallFn = dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync;

/// A function value with an explicitly declared arity.
///
/// Cloning shares the underlying function; [`Callable::ptr_eq`] tells
/// whether two handles are the very same function.
#[derive(Clone)]
pub struct Callable {
    arity: usize,
    func: Arc<CallFn>,
}

impl Callable {
    /// Wrap `func`, declaring that it takes `arity` formal parameters.
    ///
    /// The declaration is not enforced at call time: like any dynamic
    /// function, the body receives whatever arguments the caller passes.
    pub fn new<F>(arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            arity,
            func: Arc::new(func),
        }
    }

    /// Declared number of formal parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, CallError> {
        (self.func)(args)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.func, &b.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// What a name resolves to on a candidate.
#[derive(Debug, Clone)]
pub enum Member {
    Function(Callable),
    /// Any non-callable data. Falsy values count as absent.
    Value(Value),
}

impl Member {
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Member::Function(callable) => Some(callable),
            Member::Value(_) => None,
        }
    }

    /// Whether this member stands for "nothing here": `null`, `false`,
    /// zero or the empty string.
    pub fn is_absent(&self) -> bool {
        match self {
            Member::Function(_) => false,
            Member::Value(Value::Null | Value::Bool(false)) => true,
            Member::Value(Value::String(s)) => s.is_empty(),
            Member::Value(Value::Number(n)) => n.as_f64() == Some(0.0),
            Member::Value(_) => false,
        }
    }
}

impl From<Callable> for Member {
    fn from(callable: Callable) -> Self {
        Member::Function(callable)
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Member::Value(value)
    }
}

/// Chain-aware member lookup.
///
/// Implementations must check their own members first and then walk any
/// delegation they support, returning the closest definition.
pub trait Candidate {
    fn resolve(&self, name: &str) -> Option<Member>;
}

/// A value whose members can be (re)defined.
pub trait Target {
    /// Install `callable` under `name`, replacing any existing own member.
    fn define(&mut self, name: &str, callable: Callable);
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn resolve(&self, name: &str) -> Option<Member> {
        (**self).resolve(name)
    }
}

impl<C: Candidate + ?Sized> Candidate for Box<C> {
    fn resolve(&self, name: &str) -> Option<Member> {
        (**self).resolve(name)
    }
}

impl Candidate for BTreeMap<String, Member> {
    fn resolve(&self, name: &str) -> Option<Member> {
        self.get(name).cloned()
    }
}

impl Candidate for HashMap<String, Member> {
    fn resolve(&self, name: &str) -> Option<Member> {
        self.get(name).cloned()
    }
}

impl Target for BTreeMap<String, Member> {
    fn define(&mut self, name: &str, callable: Callable) {
        self.insert(name.to_string(), Member::Function(callable));
    }
}

impl Target for HashMap<String, Member> {
    fn define(&mut self, name: &str, callable: Callable) {
        self.insert(name.to_string(), Member::Function(callable));
    }
}

// ─── Object ─────────────────────────────────────────────────────────────────

/// A plain object: own members plus an optional prototype to delegate to.
#[derive(Debug, Clone, Default)]
pub struct Object {
    members: BTreeMap<String, Member>,
    prototype: Option<Prototype>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty object delegating to `prototype`.
    pub fn instance_of(prototype: &Prototype) -> Self {
        Self {
            members: BTreeMap::new(),
            prototype: Some(prototype.clone()),
        }
    }

    pub fn with(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.set(name, member);
        self
    }

    pub fn with_fn<F>(self, name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.with(name, Callable::new(arity, func))
    }

    /// Set an own member, returning the one it replaced.
    pub fn set(&mut self, name: impl Into<String>, member: impl Into<Member>) -> Option<Member> {
        self.members.insert(name.into(), member.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.members.remove(name)
    }

    pub fn own(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn own_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn prototype(&self) -> Option<&Prototype> {
        self.prototype.as_ref()
    }

    /// Replace the prototype. A plain object is never part of a chain
    /// itself, so this cannot introduce a cycle.
    pub fn set_prototype(&mut self, prototype: Option<Prototype>) {
        self.prototype = prototype;
    }

    /// Resolve `name` and invoke it with `args`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        invoke(self, name, args)
    }
}

impl Candidate for Object {
    fn resolve(&self, name: &str) -> Option<Member> {
        match self.members.get(name) {
            Some(member) => Some(member.clone()),
            None => self.prototype.as_ref()?.resolve(name),
        }
    }
}

impl Target for Object {
    fn define(&mut self, name: &str, callable: Callable) {
        self.members
            .insert(name.to_string(), Member::Function(callable));
    }
}

// ─── Prototype ──────────────────────────────────────────────────────────────

/// A shared object that other objects delegate to.
///
/// Members defined on a prototype after the fact are visible to every
/// object already delegating to it. Handles are cheap to clone and compare
/// by identity.
#[derive(Clone, Default)]
pub struct Prototype(Arc<RwLock<Object>>);

impl Prototype {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(object: Object) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// A fresh prototype whose own chain continues at `parent`.
    pub fn extends(parent: &Prototype) -> Self {
        Self::from_object(Object::instance_of(parent))
    }

    /// Builder form of [`Prototype::set`].
    pub fn with_fn<F>(self, name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.set(name, Callable::new(arity, func));
        self
    }

    pub fn set(&self, name: impl Into<String>, member: impl Into<Member>) -> Option<Member> {
        self.write().set(name, member)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.read().has_own(name)
    }

    pub fn parent(&self) -> Option<Prototype> {
        self.read().prototype().cloned()
    }

    /// Re-link this prototype's chain. Rejected if `parent` already
    /// delegates (directly or transitively) to `self`.
    pub fn set_parent(&self, parent: Option<Prototype>) -> Result<(), ObjectError> {
        if parent.as_ref().is_some_and(|p| p.chain_contains(self)) {
            return Err(ObjectError::PrototypeCycle);
        }
        self.write().set_prototype(parent);
        Ok(())
    }

    /// Whether `other` is this prototype or one of its ancestors.
    pub fn chain_contains(&self, other: &Prototype) -> bool {
        let mut cursor = Some(self.clone());
        while let Some(current) = cursor {
            if Prototype::ptr_eq(&current, other) {
                return true;
            }
            cursor = current.parent();
        }
        false
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        invoke(self, name, args)
    }

    fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read();
        f.debug_struct("Prototype")
            .field("members", &guard.own_names().collect::<Vec<_>>())
            .field("parent", &guard.prototype())
            .finish()
    }
}

impl Candidate for Prototype {
    fn resolve(&self, name: &str) -> Option<Member> {
        // Release the lock before walking up the chain.
        let parent = {
            let guard = self.read();
            if let Some(member) = guard.own(name) {
                return Some(member.clone());
            }
            guard.prototype().cloned()
        };
        parent?.resolve(name)
    }
}

impl Target for Prototype {
    fn define(&mut self, name: &str, callable: Callable) {
        self.set(name, callable);
    }
}

fn invoke<C: Candidate + ?Sized>(
    candidate: &C,
    name: &str,
    args: &[Value],
) -> Result<Value, CallError> {
    match candidate.resolve(name) {
        None => Err(CallError::NoSuchMember(name.to_string())),
        Some(member) if member.is_absent() => Err(CallError::NoSuchMember(name.to_string())),
        Some(Member::Function(callable)) => callable.call(args),
        Some(Member::Value(_)) => Err(CallError::NotCallable(name.to_string())),
    }
}
