//! Policy constants carried over from the source parser.
//!
//! These bound traversal of attacker-controlled, self-referential tables.
//! They are policy, not specification, and are kept as ordinary `pub const`
//! items so a host application can see (and, if it forks the crate, adjust)
//! them rather than hunting for a magic number in the middle of a loop.

/// Maximum length, in bytes, of any length-bounded ASCII string read
/// (import names, forwarder strings, debug PDB paths, bound-import module
/// names). Matches `MAX_PATH` in the source parser.
pub const MAX_PATH: usize = 260;

/// Maximum length, in UTF-16 code units, of a resource directory entry name.
pub const MAX_RESOURCE_NAME: usize = MAX_PATH;

/// Hard cap on the number of import descriptors walked in a single image.
/// Exceeding this halts import parsing entirely.
pub const MAX_MODULES: usize = 1000;

/// Hard cap on the number of thunks walked per import/delay-import module.
/// Exceeding this caps that module's function list and moves on to the
/// next descriptor.
pub const MAX_FUNCS_PER_MODULE: usize = 5000;

/// Maximum resource-directory recursion depth. The format defines exactly
/// three levels (Type, Name, Language); this is a belt-and-suspenders cap
/// in case a crafted image's directory entries point deeper than the
/// nominal three levels without tripping the ancestor-cycle check.
pub const MAX_RESOURCE_DEPTH: usize = 8;
