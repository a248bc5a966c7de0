use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, StdinLock, StdoutLock, Write},
    path::PathBuf,
};

use anyhow::Context;

/// Destination of record results and reports: a file or standard output.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty-printed JSON to `output_path`, or to stdout if `None`.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::for_path(output_path)?;
        serde_json::to_writer_pretty(&mut output, value)
            .with_context(|| format!("Failed to write JSON to {}", output.display_path()))?;
        output.write_line("")?;
        output.finish()
    }

    pub fn for_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::Stdout {
                writer: io::stdout().lock(),
            }),
        }
    }

    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self, "{line}")
            .with_context(|| format!("Failed to write to {}", self.display_path()))
    }

    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Line-oriented record source: a file or standard input.
#[derive(Debug)]
pub enum Input {
    Stdin {
        reader: StdinLock<'static>,
    },
    File {
        reader: BufReader<File>,
        path: PathBuf,
    },
}

impl Input {
    pub fn for_path(input_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match input_path {
            Some(path) => Input::open(path),
            None => Ok(Input::Stdin {
                reader: io::stdin().lock(),
            }),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        Ok(Input::File {
            reader: BufReader::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Input::Stdin { .. } => "stdin".to_owned(),
            Input::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Stdin { reader } => reader.read(buf),
            Input::File { reader, .. } => reader.read(buf),
        }
    }
}

impl BufRead for Input {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Input::Stdin { reader } => reader.fill_buf(),
            Input::File { reader, .. } => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amount: usize) {
        match self {
            Input::Stdin { reader } => reader.consume(amount),
            Input::File { reader, .. } => reader.consume(amount),
        }
    }
}
