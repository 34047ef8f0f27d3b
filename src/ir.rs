//! Decoded instruction representation.

/// A single decoded instruction: an opcode token and its arguments.
///
/// The opcode is kept as the literal source token; whether it names a real
/// operation is only decided when the instruction is dispatched. The
/// execution index is not stored here; it is the instruction's position
/// in the loaded program.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Instruction {
    opcode: String,
    args: Vec<String>,
}

impl Instruction {
    /// Creates a new `Instruction`.
    pub fn new(opcode: impl Into<String>, args: Vec<String>) -> Instruction {
        Instruction {
            opcode: opcode.into(),
            args,
        }
    }

    /// The opcode token, case-sensitive.
    pub fn opcode(&self) -> &str {
        &self.opcode
    }

    /// The `n`-th argument, if present.
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.args.get(n).map(String::as_str)
    }

    /// All arguments in source order.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}
