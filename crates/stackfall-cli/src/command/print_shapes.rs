use std::io::{self, Write as _};

use stackfall_engine::ShapeKind;

pub(crate) fn run() -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for shape in ShapeKind::ALL {
        writeln!(
            stdout,
            "Shape: {shape} ({}x{})",
            shape.width(),
            shape.height()
        )?;
        write!(stdout, "{}", shape.render(shape.as_char()))?;
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}
