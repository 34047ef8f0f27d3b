use std::io::{self, BufRead};

pub trait BufReadExt: BufRead {
    /// Reads one line, stripping the `\n` or `\r\n` terminator but nothing
    /// else. Returns `None` once the input is exhausted.
    fn read_text_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> BufReadExt for R {}
