use crate::position::Position;
use crate::value::Value;
use std::collections::HashMap;

/// Handle to a frame in the arena. Plain index, freely copyable; frames are
/// never moved, so a handle stays valid until its frame is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// One call/scope frame.
///
/// `parent` is the traceback chain (the frame active where this one was
/// defined); `lexical_parent` is the name-resolution chain. The two are
/// independent links.
#[derive(Debug)]
pub struct Frame {
    pub name: String,
    pub parent: Option<ScopeId>,
    /// Where in the parent this frame was entered.
    pub entry_pos: Option<Position>,
    lexical_parent: Option<ScopeId>,
    symbols: HashMap<String, Value>,
}

/// Arena of scope frames. Parent links are non-owning indices, so the scope
/// tree needs no shared ownership; released frames go to a free list and
/// their slots are reused by later calls.
#[derive(Debug, Default)]
pub struct Frames {
    frames: Vec<Frame>,
    free: Vec<usize>,
}

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        name: &str,
        parent: Option<ScopeId>,
        entry_pos: Option<Position>,
        lexical_parent: Option<ScopeId>,
    ) -> ScopeId {
        let frame = Frame {
            name: name.to_string(),
            parent,
            entry_pos,
            lexical_parent,
            symbols: HashMap::new(),
        };
        match self.free.pop() {
            Some(index) => {
                self.frames[index] = frame;
                ScopeId(index)
            }
            None => {
                self.frames.push(frame);
                ScopeId(self.frames.len() - 1)
            }
        }
    }

    /// Return a frame's slot to the free list once its owning call is done.
    pub fn release(&mut self, id: ScopeId) {
        self.free.push(id.0);
    }

    pub fn get(&self, id: ScopeId) -> &Frame {
        &self.frames[id.0]
    }

    /// Resolve a name against the lexical chain. A miss is "not found",
    /// never an error.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<Value> {
        let mut at = Some(id);
        while let Some(scope) = at {
            let frame = &self.frames[scope.0];
            if let Some(value) = frame.symbols.get(name) {
                return Some(value.clone());
            }
            at = frame.lexical_parent;
        }
        None
    }

    /// Bindings always land in the local frame.
    pub fn bind(&mut self, id: ScopeId, name: &str, value: Value) {
        self.frames[id.0].symbols.insert(name.to_string(), value);
    }

    /// Remove a local binding. No-op when the name is not bound locally.
    pub fn unbind(&mut self, id: ScopeId, name: &str) {
        self.frames[id.0].symbols.remove(name);
    }
}
