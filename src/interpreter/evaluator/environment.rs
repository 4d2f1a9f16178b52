use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use crate::interpreter::value::{core::Value, object::ObjectValue};

/// A shared handle to an environment frame.
pub type Env = Rc<RefCell<Environment>>;

/// One frame of the lexical scope chain.
///
/// Frames are created for the global scope, for every block, loop and
/// function call. A frame created by a function call is a *function scope*
/// and carries the receiver bound to `this` for that call, if any.
#[derive(Debug, Default)]
pub struct Environment {
    values:         HashMap<String, Value>,
    parent:         Option<Env>,
    function_scope: bool,
    this:           Option<Value>,
}

impl Environment {
    /// Creates the global frame.
    ///
    /// The global frame counts as a function scope without a receiver, so
    /// reading `this` at the top level is an error.
    #[must_use]
    pub fn global() -> Env {
        Rc::new(RefCell::new(Self { function_scope: true,
                                    ..Self::default() }))
    }

    /// Creates a block frame whose parent is `parent`.
    #[must_use]
    pub fn child(parent: &Env) -> Env {
        Rc::new(RefCell::new(Self { parent: Some(Rc::clone(parent)),
                                    ..Self::default() }))
    }

    /// Creates the frame for a function call.
    ///
    /// # Parameters
    /// - `closure`: The environment the called function was created in.
    /// - `this`: The receiver for method calls, `None` for plain calls.
    #[must_use]
    pub fn call_frame(closure: &Env, this: Option<Value>) -> Env {
        Rc::new(RefCell::new(Self { parent: Some(Rc::clone(closure)),
                                    function_scope: true,
                                    this,
                                    ..Self::default() }))
    }

    /// Creates a sibling frame with copies of the bindings of `env`.
    ///
    /// `for` loops fork their frame before every update, so closures created
    /// in one iteration keep the loop variable's value of that iteration.
    #[must_use]
    pub fn fork(env: &Env) -> Env {
        let frame = env.borrow();
        Rc::new(RefCell::new(Self { values:         frame.values.clone(),
                                    parent:         frame.parent.clone(),
                                    function_scope: frame.function_scope,
                                    this:           frame.this.clone(), }))
    }

    /// Defines a name in this frame, shadowing any outer definition.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Drops every binding and the parent link.
    ///
    /// Used at the end of a run to break reference cycles between frames and
    /// the closures stored in them.
    fn clear(&mut self) {
        self.values.clear();
        self.parent = None;
        self.this = None;
    }
}

/// Looks up a name, searching from `env` outwards.
#[must_use]
pub fn lookup(env: &Env, name: &str) -> Option<Value> {
    let mut current = Rc::clone(env);
    loop {
        let parent = {
            let frame = current.borrow();
            if let Some(value) = frame.values.get(name) {
                return Some(value.clone());
            }
            frame.parent.clone()?
        };
        current = parent;
    }
}

/// Assigns to the nearest frame that defines `name`.
///
/// # Returns
/// `false` if no frame defines the name; nothing is assigned then.
pub fn assign(env: &Env, name: &str, value: Value) -> bool {
    let mut current = Rc::clone(env);
    loop {
        let parent = {
            let mut frame = current.borrow_mut();
            if let Some(slot) = frame.values.get_mut(name) {
                *slot = value;
                return true;
            }
            match frame.parent.clone() {
                Some(parent) => parent,
                None => return false,
            }
        };
        current = parent;
    }
}

/// Finds the receiver bound to `this`.
///
/// The search stops at the nearest function scope: blocks inside a method
/// see the method's receiver, but a function called without a receiver
/// does not see the receiver of the function that created it.
#[must_use]
pub fn this_value(env: &Env) -> Option<Value> {
    let mut current = Rc::clone(env);
    loop {
        let parent = {
            let frame = current.borrow();
            if frame.function_scope {
                return frame.this.clone();
            }
            frame.parent.clone()?
        };
        current = parent;
    }
}

/// Tracks every frame and object a run allocates.
///
/// Closures stored in a frame reference that frame, and objects may
/// reference themselves, so plain reference counting never frees them.
/// The heap holds weak handles only; [`Heap::release`] clears everything
/// still alive, which breaks the cycles and lets the memory go.
#[derive(Debug, Default)]
pub struct Heap {
    frames:  Vec<Weak<RefCell<Environment>>>,
    objects: Vec<Weak<RefCell<ObjectValue>>>,
    limit:   usize,
}

const INITIAL_LIMIT: usize = 1024;

impl Heap {
    /// Registers a frame.
    pub fn track_frame(&mut self, env: &Env) {
        self.frames.push(Rc::downgrade(env));
        self.collect_if_needed();
    }

    /// Registers an object.
    pub fn track_object(&mut self, object: &Rc<RefCell<ObjectValue>>) {
        self.objects.push(Rc::downgrade(object));
        self.collect_if_needed();
    }

    /// Forgets handles whose targets are already gone, once the list has
    /// doubled since the last pass.
    fn collect_if_needed(&mut self) {
        let limit = self.limit.max(INITIAL_LIMIT);
        if self.frames.len() + self.objects.len() < limit {
            return;
        }
        self.frames.retain(|frame| frame.strong_count() > 0);
        self.objects.retain(|object| object.strong_count() > 0);
        self.limit = (self.frames.len() + self.objects.len()) * 2;
    }

    /// Clears every frame and object that is still alive.
    pub fn release(&mut self) {
        for frame in self.frames.drain(..).filter_map(|weak| weak.upgrade()) {
            if let Ok(mut frame) = frame.try_borrow_mut() {
                frame.clear();
            }
        }
        for object in self.objects.drain(..).filter_map(|weak| weak.upgrade()) {
            if let Ok(mut object) = object.try_borrow_mut() {
                object.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_assign_walk_the_chain() {
        let global = Environment::global();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::child(&global);
        inner.borrow_mut().define("y", Value::Number(2.0));

        assert_eq!(lookup(&inner, "x"), Some(Value::Number(1.0)));
        assert!(assign(&inner, "x", Value::Number(5.0)));
        assert_eq!(lookup(&global, "x"), Some(Value::Number(5.0)));
        assert_eq!(lookup(&global, "y"), None);
        assert!(!assign(&inner, "z", Value::Undefined));
    }

    #[test]
    fn this_stops_at_the_function_scope() {
        let global = Environment::global();
        let receiver = Value::from(ObjectValue::default());
        let method = Environment::call_frame(&global, Some(receiver.clone()));
        let block = Environment::child(&method);
        let plain = Environment::call_frame(&block, None);

        assert_eq!(this_value(&block), Some(receiver));
        assert_eq!(this_value(&plain), None);
        assert_eq!(this_value(&global), None);
    }

    #[test]
    fn release_breaks_cycles() {
        let mut heap = Heap::default();
        let global = Environment::global();
        heap.track_frame(&global);
        let object = Rc::new(RefCell::new(ObjectValue::default()));
        heap.track_object(&object);
        object.borrow_mut().set("me", Value::Object(Rc::clone(&object)));
        global.borrow_mut().define("o", Value::Object(Rc::clone(&object)));

        let weak = Rc::downgrade(&object);
        drop(object);
        heap.release();
        drop(global);

        assert!(weak.upgrade().is_none());
    }
}
