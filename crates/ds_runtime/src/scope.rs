//! Host-supplied name resolution.
use crate::Value;

/// Load/store callbacks consulted before the context's own attribute maps.
///
/// Both methods run synchronously inside the VM loop and must not re-enter the context.
pub trait ScopeHooks {
    /// Answer a name load, or `None` to fall through to frame locals and globals.
    fn load(&mut self, _name: &str) -> Option<Value> {
        None
    }

    /// Take a name store. Returning `false` lets the context store it itself.
    fn store(&mut self, _name: &str, _value: &Value) -> bool {
        false
    }
}
