/*! An interpreter for the HLLL scripting language.

`hlll` provides the instruction decoder, the program loader,
and the virtual machine that executes HLLL programs.

HLLL is a minimal assembly-like language: one instruction per line, a
single operand stack of textual values, named variables, and named jump
targets declared with `flg`. Execution begins at the instruction after
the `sof` marker and runs until `hlt` or a fault.

```rust
use std::io::Cursor;

use hlll::machine::Machine;
use hlll::program::Program;

fn main() {
    let src = "sof\npsh hello\\sworld\nwln\nhlt 0";
    let program = Program::load(&mut Cursor::new(src)).unwrap();
    let mut machine = Machine::new(Cursor::new(""), Vec::new());
    match machine.run(&program) {
        Ok(code) => assert_eq!(code, 0),
        Err(e) => panic!("{}", e),
    }
}
```
*/

#![warn(missing_docs)]

/// Major version number.
pub const VERSION_MAJOR: usize = 1;
/// Minor version number.
pub const VERSION_MINOR: usize = 0;
/// Patch version number.
pub const VERSION_TINY: usize = 0;
/// Whether this build is a pre-release.
pub const PRE_RELEASE: bool = false;

/// Build version string.
pub fn version() -> String {
    format!(
        "{}.{}.{}{}",
        VERSION_MAJOR,
        VERSION_MINOR,
        VERSION_TINY,
        if PRE_RELEASE { "-pre" } else { "" }
    )
}

pub(crate) mod io;
pub mod ir;
pub mod machine;
pub mod program;
pub mod syntax;
