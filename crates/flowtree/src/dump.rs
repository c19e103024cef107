use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    Flows,
    error::{Error, Result},
    flow::FlowState,
    id::FlowId,
};

/// Render a flow subtree as indented text, one flow per line followed by its
/// fields, with ANSI colors. This is a debug function.
pub fn dump(flows: &Flows, root: FlowId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_flow(&mut buffer, flows, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color codes. Useful in logs and tests.
pub fn dump_plain(flows: &Flows, root: FlowId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_flow(&mut buffer, flows, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Helper to write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a flow subtree and emit formatted debug output.
fn dump_flow(buffer: &mut Buffer, flows: &Flows, id: FlowId, level: usize) -> Result<()> {
    let flow = flows.flow(id).ok_or(Error::FlowNotFound(id))?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", flow.name())?;
    buffer.reset()?;
    write!(buffer, " {id:?}")?;
    let state = match flow.state() {
        FlowState::Idle => Some(("idle", Color::Yellow)),
        FlowState::Started => None,
        FlowState::Stopping => Some(("STOPPING", Color::Magenta)),
    };
    if let Some((label, color)) = state {
        write!(buffer, " ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(buffer, "{label}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    write_field(buffer, &indent, "presentation:", flow.presentation().kind())?;
    let initial = flow
        .initial_screen()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "-".into());
    write_field(buffer, &indent, "initial:", &initial)?;
    write_field(buffer, &indent, "surface:", &format!("{:?}", flow.surface()))?;

    for child in flow.children() {
        dump_flow(buffer, flows, *child, level + 1)?;
    }
    Ok(())
}
