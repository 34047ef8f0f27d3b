//! The program loader.

use std::collections::HashMap;
use std::io::{self, BufRead};

use crate::ir::Instruction;
use crate::syntax;

/// A list specifying load errors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Program contains no `sof` instruction.
    #[error("program has no 'sof' instruction")]
    MissingStart,
    /// I/O error while reading the source.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A loaded program: the dense instruction list, the flag table, and the
/// index of the start marker.
///
/// Execution indices are positions in the instruction list. Blank source
/// lines never consume an index. `Program` is immutable once loaded; all
/// mutable run state lives in the machine.
pub struct Program {
    instructions: Vec<Instruction>,
    flags: HashMap<String, usize>,
    start: usize,
}

impl Program {
    /// Loads a program in a single pass over the source lines.
    ///
    /// Each `flg <name>` registers a flag targeting the instruction after
    /// the declaration; the first declaration wins when names collide. If
    /// several `sof` markers appear the last one wins, silently. A program
    /// without any `sof` fails with [`LoadError::MissingStart`]; execution
    /// never defaults to the top of the file.
    pub fn load<B: BufRead>(input: &mut B) -> Result<Program, LoadError> {
        let mut instructions = Vec::new();
        let mut flags: HashMap<String, usize> = HashMap::new();
        let mut start = None;
        for line in input.lines() {
            let line = line?;
            let inst = match syntax::decode(&line) {
                Some(inst) => inst,
                None => continue,
            };
            let index = instructions.len();
            match inst.opcode() {
                "sof" => start = Some(index),
                "flg" => {
                    // A bare `flg` declares nothing; it still takes an index.
                    if let Some(name) = inst.arg(0) {
                        flags.entry(name.to_string()).or_insert(index + 1);
                    }
                }
                _ => {}
            }
            instructions.push(inst);
        }
        match start {
            Some(start) => Ok(Program {
                instructions,
                flags,
                start,
            }),
            None => Err(LoadError::MissingStart),
        }
    }

    /// The instruction at `index`, if the index is in range.
    pub fn fetch(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// The jump target registered for `name`, exact case-sensitive match.
    pub fn flag(&self, name: &str) -> Option<usize> {
        self.flags.get(name).copied()
    }

    /// Index of the `sof` marker. Execution begins at the next index.
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Number of loaded instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
