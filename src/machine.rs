//! A virtual machine that executes HLLL programs.

use std::collections::HashMap;
use std::io::{self, stdin, stdout, BufRead, BufReader, Stdin, Stdout, Write};

use log::debug;

use crate::io::BufReadExt;
use crate::ir::Instruction;
use crate::program::Program;

/// Result of a machine operation.
pub type MachineResult<T> = Result<T, MachineError>;

/// A list specifying runtime faults.
///
/// Any fault halts the whole program immediately. There is no recovery
/// mechanism at the language level; the machine resolves every fault into a
/// clean `Err` so the invoking layer can report and exit normally.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// Empty stack popped by a consuming opcode.
    #[error("stack is empty")]
    StackEmpty,
    /// Second operand popped from a one-element stack.
    #[error("not enough stack")]
    StackShort,
    /// Opcode requires an argument that the instruction lacks.
    #[error("argument required at '{0}'")]
    MissingArgument(String),
    /// Tried to load or delete a variable that is not defined.
    #[error("variable '{0}' not found")]
    UndefinedVariable(String),
    /// Tried to jump to a flag name that is not declared.
    #[error("no flag found named '{0}'")]
    UndefinedFlag(String),
    /// Operand could not be parsed as a float.
    #[error("operand '{0}' is not a float")]
    NotANumber(String),
    /// `hlt` argument could not be parsed as an integer.
    #[error("exit code '{0}' is not an integer")]
    BadExitCode(String),
    /// Opcode token names no operation.
    #[error("invalid instruction '{0}'")]
    InvalidInstruction(String),
    /// Instruction pointer left the program.
    #[error("no instruction at index {0}")]
    OutOfProgram(usize),
    /// `rln` executed with the input exhausted.
    #[error("end of input reached")]
    EndOfInput,
    /// I/O error occurred.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

use self::MachineError::*;

/// Disposition of one dispatched instruction.
enum Flow {
    Continue,
    Exit(i32),
}

/// A virtual machine.
///
/// Owns the operand stack, the variable table, and the two I/O
/// collaborators. One `Machine` runs one program at a time; independent
/// runs share nothing.
pub struct Machine<B, W> {
    stack: Vec<String>,
    variables: HashMap<String, String>,
    stdin: B,
    stdout: W,
}

/// Creates a new `Machine` wired to the process's stdin and stdout.
pub fn with_stdio() -> Machine<BufReader<Stdin>, Stdout> {
    Machine::new(BufReader::new(stdin()), stdout())
}

impl<B: BufRead, W: Write> Machine<B, W> {
    /// Creates a new `Machine` with input and output.
    pub fn new(stdin: B, stdout: W) -> Machine<B, W> {
        Machine {
            stack: Vec::new(),
            variables: HashMap::new(),
            stdin,
            stdout,
        }
    }

    /// Runs the program until it halts.
    ///
    /// Execution starts at the instruction after the `sof` marker and only
    /// stops on `hlt` (yielding its exit code) or on a fault. There is no
    /// iteration limit; a program that never halts runs forever.
    pub fn run(&mut self, program: &Program) -> MachineResult<i32> {
        let mut pc = program.start_index() + 1;
        loop {
            match self.step(program, &mut pc)? {
                Flow::Continue => continue,
                Flow::Exit(code) => return Ok(code),
            }
        }
    }

    /// Fetches and dispatches the instruction at `*pc`, then advances the
    /// pointer by one unless the opcode set it (a taken jump or branch).
    fn step(&mut self, program: &Program, pc: &mut usize) -> MachineResult<Flow> {
        let inst = program.fetch(*pc).ok_or(OutOfProgram(*pc))?;
        debug!("{:>4} {} {:?}", *pc, inst.opcode(), inst.args());
        let mut next = *pc + 1;
        match inst.opcode() {
            "wrt" => {
                let a = self.pop()?;
                self.write(&a, false)?;
            }
            "wln" => {
                let a = self.pop()?;
                self.write(&a, true)?;
            }
            "rln" => {
                let line = self.stdin.read_text_line()?.ok_or(EndOfInput)?;
                self.stack.push(line);
            }
            "stv" => {
                let value = self.pop()?;
                let name = arg(inst)?;
                self.variables.insert(name.to_string(), value);
            }
            "ldv" => {
                let name = arg(inst)?;
                let value = self
                    .variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| UndefinedVariable(name.to_string()))?;
                self.stack.push(value);
            }
            "dlv" => {
                let name = arg(inst)?;
                self.variables
                    .remove(name)
                    .ok_or_else(|| UndefinedVariable(name.to_string()))?;
            }
            "psh" => {
                let literal = arg(inst)?;
                self.stack.push(literal.to_string());
            }
            // Silent no-op on an empty stack, unlike every other consumer.
            "pop" => {
                let _ = self.stack.pop();
            }
            "add" => self.calc(|a, b| a + b)?,
            "sub" => self.calc(|a, b| a - b)?,
            "mul" => self.calc(|a, b| a * b)?,
            "div" => self.calc(|a, b| a / b)?,
            "jmp" => next = resolve(program, arg(inst)?)?,
            "bie" => {
                let name = arg(inst)?;
                let (a, b) = self.pop_pair()?;
                // Raw string equality, no numeric coercion.
                if a == b {
                    next = resolve(program, name)?;
                }
            }
            "big" => next = self.branch(program, inst, next, |a, b| a > b)?,
            "bge" => next = self.branch(program, inst, next, |a, b| a >= b)?,
            "bil" => next = self.branch(program, inst, next, |a, b| a < b)?,
            "ble" => next = self.branch(program, inst, next, |a, b| a <= b)?,
            "biz" => {
                let name = arg(inst)?;
                let a = number(&self.pop()?)?;
                if a == 0.0 {
                    next = resolve(program, name)?;
                }
            }
            "hlt" => {
                let code = arg(inst)?;
                let code = code.parse().map_err(|_| BadExitCode(code.to_string()))?;
                debug!("halt with code {}", code);
                return Ok(Flow::Exit(code));
            }
            // Pure markers with no runtime effect.
            "flg" | "sof" | "nop" => {}
            other => return Err(InvalidInstruction(other.to_string())),
        }
        *pc = next;
        Ok(Flow::Continue)
    }

    fn pop(&mut self) -> MachineResult<String> {
        self.stack.pop().ok_or(StackEmpty)
    }

    /// Pops A (top) then B. The first pop faults with `StackEmpty`, the
    /// second with `StackShort`; A stays popped either way.
    fn pop_pair(&mut self) -> MachineResult<(String, String)> {
        let a = self.pop()?;
        let b = self.stack.pop().ok_or(StackShort)?;
        Ok((a, b))
    }

    /// Pops A then B, parses both as single-precision floats, and pushes
    /// the decimal rendering of `f(a, b)`. Division by zero is not a fault:
    /// the IEEE result (`inf`, `-inf` or `NaN`) is pushed as text.
    fn calc(&mut self, f: impl FnOnce(f32, f32) -> f32) -> MachineResult<()> {
        let (a, b) = self.pop_pair()?;
        let result = f(number(&a)?, number(&b)?);
        self.stack.push(result.to_string());
        Ok(())
    }

    /// Pops A then B and jumps when `test(a, b)` holds. The flag name is
    /// resolved only on a taken branch, so an unknown name in a not-taken
    /// branch never faults.
    fn branch(
        &mut self,
        program: &Program,
        inst: &Instruction,
        next: usize,
        test: impl FnOnce(f32, f32) -> bool,
    ) -> MachineResult<usize> {
        let name = arg(inst)?;
        let (a, b) = self.pop_pair()?;
        if test(number(&a)?, number(&b)?) {
            resolve(program, name)
        } else {
            Ok(next)
        }
    }

    fn write(&mut self, text: &str, terminate: bool) -> MachineResult<()> {
        if terminate {
            writeln!(self.stdout, "{}", text)?;
        } else {
            write!(self.stdout, "{}", text)?;
        }
        // Flush per write so prompts interleave with `rln`.
        self.stdout.flush()?;
        Ok(())
    }
}

fn arg(inst: &Instruction) -> MachineResult<&str> {
    inst.arg(0)
        .ok_or_else(|| MissingArgument(inst.opcode().to_string()))
}

fn number(token: &str) -> MachineResult<f32> {
    token.parse().map_err(|_| NotANumber(token.to_string()))
}

fn resolve(program: &Program, name: &str) -> MachineResult<usize> {
    program
        .flag(name)
        .ok_or_else(|| UndefinedFlag(name.to_string()))
}
