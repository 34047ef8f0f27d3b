//! The instruction decoder.
//!
//! One raw source line decodes to at most one [`Instruction`]. The line is
//! trimmed and split on single spaces: the first token is the opcode, every
//! following token an argument. `\s` inside an argument decodes to a literal
//! space; there is no quoting and no comment syntax. Nothing is validated
//! here: argument counts and operand types are checked only when the
//! instruction is actually executed, so a malformed program still loads.

use crate::ir::Instruction;

/// Decodes one source line. Returns `None` for blank lines, which are
/// dropped before index assignment.
pub fn decode(line: &str) -> Option<Instruction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    // Split on single spaces only. Tabs do not separate tokens, and
    // consecutive spaces yield empty argument tokens.
    let mut tokens = line.split(' ');
    let opcode = match tokens.next() {
        Some(op) if !op.is_empty() => op,
        _ => return Some(Instruction::new("nop", vec![])),
    };
    let args = tokens.map(unescape).collect();
    Some(Instruction::new(opcode, args))
}

/// `\s` is the only escape: it decodes to a single space. The opcode token
/// is never unescaped.
fn unescape(token: &str) -> String {
    token.replace("\\s", " ")
}
