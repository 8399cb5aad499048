//! Line-based event scripts replayed onto an [`InputDispatcher`].
//!
//! Each non-empty line holds one command. Lines starting with `#` and
//! trailing `# ...` text are comments:
//!
//! ```text
//! tool line
//! down 10 10
//! move 50 50
//! up 90 90
//! key Ctrl+Z
//! ```

use crate::draw::{Color, Point};
use crate::input::{InputDispatcher, Key, MouseButton, ToolKind};
use thiserror::Error;

/// A script line that could not be parsed.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl ScriptError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// One parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Down(MouseButton, Point),
    Move(Point),
    Up(MouseButton, Point),
    Leave,
    /// The canvas lost keyboard focus
    Blur,
    /// Held modifiers followed by the key itself
    Key(Vec<Key>, Key),
    Tool(ToolKind),
    Color(Color),
    Width(f64),
    Clear,
    Undo,
    Redo,
    Resize(u32, u32),
}

/// Parses a whole script. Line numbers in errors are 1-based.
pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        if let Some(command) = parse_line(raw, index + 1)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parses one line, returning `None` for blank lines and comments.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<Command>, ScriptError> {
    let content = strip_comment(raw).trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut words = content.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let expect_args = |count: usize| {
        if args.len() == count {
            Ok(())
        } else {
            Err(ScriptError::new(
                line,
                format!("'{name}' takes {count} argument(s), got {}", args.len()),
            ))
        }
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "down" | "up" => {
            if !(2..=3).contains(&args.len()) {
                return Err(ScriptError::new(
                    line,
                    format!("'{name}' takes X Y [BUTTON], got {} argument(s)", args.len()),
                ));
            }
            let point = parse_point(&args[..2], line)?;
            let button = match args.get(2) {
                Some(button) => parse_button(button, line)?,
                None => MouseButton::Left,
            };
            if name.eq_ignore_ascii_case("down") {
                Command::Down(button, point)
            } else {
                Command::Up(button, point)
            }
        }
        "move" => {
            expect_args(2)?;
            Command::Move(parse_point(&args, line)?)
        }
        "leave" => {
            expect_args(0)?;
            Command::Leave
        }
        "blur" => {
            expect_args(0)?;
            Command::Blur
        }
        "key" => {
            expect_args(1)?;
            let (modifiers, key) = parse_key_spec(args[0], line)?;
            Command::Key(modifiers, key)
        }
        "tool" => {
            expect_args(1)?;
            let tool = args[0]
                .parse::<ToolKind>()
                .map_err(|err| ScriptError::new(line, err))?;
            Command::Tool(tool)
        }
        "color" => {
            // rgb(...) forms may contain spaces
            let spec = content[name.len()..].trim();
            let color = Color::parse(spec).map_err(|err| ScriptError::new(line, err.to_string()))?;
            Command::Color(color)
        }
        "width" => {
            expect_args(1)?;
            Command::Width(parse_number(args[0], line)?)
        }
        "clear" => {
            expect_args(0)?;
            Command::Clear
        }
        "undo" => {
            expect_args(0)?;
            Command::Undo
        }
        "redo" => {
            expect_args(0)?;
            Command::Redo
        }
        "resize" => {
            expect_args(2)?;
            let parse_dim = |value: &str| {
                value
                    .parse::<u32>()
                    .map_err(|_| ScriptError::new(line, format!("invalid dimension '{value}'")))
            };
            Command::Resize(parse_dim(args[0])?, parse_dim(args[1])?)
        }
        other => {
            return Err(ScriptError::new(line, format!("unknown command '{other}'")));
        }
    };

    Ok(Some(command))
}

/// Drops a whole-line `#` comment or a trailing one introduced by `# `.
/// A `#` glued to a word (`color #ff8800`) is kept.
fn strip_comment(raw: &str) -> &str {
    if raw.trim_start().starts_with('#') {
        return "";
    }
    let bytes = raw.as_bytes();
    for (index, _) in raw.match_indices('#') {
        let before_is_space = index == 0 || bytes[index - 1].is_ascii_whitespace();
        let after_is_space = bytes.get(index + 1).is_none_or(|b| b.is_ascii_whitespace());
        if before_is_space && after_is_space {
            return &raw[..index];
        }
    }
    raw
}

fn parse_number(value: &str, line: usize) -> Result<f64, ScriptError> {
    value
        .parse::<f64>()
        .map_err(|_| ScriptError::new(line, format!("invalid number '{value}'")))
}

fn parse_point(args: &[&str], line: usize) -> Result<Point, ScriptError> {
    Ok(Point::new(parse_number(args[0], line)?, parse_number(args[1], line)?))
}

fn parse_button(value: &str, line: usize) -> Result<MouseButton, ScriptError> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Ok(MouseButton::Left),
        "right" => Ok(MouseButton::Right),
        "middle" => Ok(MouseButton::Middle),
        _ => Err(ScriptError::new(line, format!("unknown button '{value}'"))),
    }
}

/// Splits `Ctrl+Shift+Z` into its modifiers and final key. A trailing `+`
/// names the plus key itself (`Ctrl++`).
fn parse_key_spec(spec: &str, line: usize) -> Result<(Vec<Key>, Key), ScriptError> {
    let (modifier_part, key_name) = if spec == "+" {
        ("", "+")
    } else if let Some(prefix) = spec.strip_suffix("++") {
        (prefix, "+")
    } else {
        spec.rsplit_once('+').unwrap_or(("", spec))
    };

    let key = Key::from_name(key_name);
    if key == Key::Unknown || key_name.is_empty() {
        return Err(ScriptError::new(line, format!("unknown key '{key_name}'")));
    }

    let mut modifiers = Vec::new();
    for part in modifier_part.split('+').filter(|part| !part.is_empty()) {
        match Key::from_name(part) {
            modifier @ (Key::Ctrl | Key::Shift | Key::Alt) => modifiers.push(modifier),
            _ => {
                return Err(ScriptError::new(line, format!("'{part}' is not a modifier")));
            }
        }
    }

    Ok((modifiers, key))
}

/// Feeds parsed commands to the dispatcher in order.
pub fn run(dispatcher: &mut InputDispatcher, commands: &[Command]) {
    for command in commands {
        apply(dispatcher, command);
    }
}

/// Feeds one command to the dispatcher.
pub fn apply(dispatcher: &mut InputDispatcher, command: &Command) {
    log::trace!("Script command: {:?}", command);
    match command {
        Command::Down(button, point) => dispatcher.on_pointer_down(*button, *point),
        Command::Move(point) => dispatcher.on_pointer_move(*point),
        Command::Up(button, point) => dispatcher.on_pointer_up(*button, *point),
        Command::Leave => dispatcher.on_pointer_leave(),
        Command::Blur => dispatcher.on_focus_lost(),
        Command::Key(modifiers, key) => {
            for modifier in modifiers {
                dispatcher.on_key_press(*modifier);
            }
            dispatcher.on_key_press(*key);
            dispatcher.on_key_release(*key);
            for modifier in modifiers.iter().rev() {
                dispatcher.on_key_release(*modifier);
            }
        }
        Command::Tool(tool) => dispatcher.set_tool(*tool),
        Command::Color(color) => dispatcher.set_color(*color),
        Command::Width(width) => dispatcher.set_width(*width),
        Command::Clear => dispatcher.clear_canvas(),
        Command::Undo => dispatcher.undo(),
        Command::Redo => dispatcher.redo(),
        Command::Resize(width, height) => dispatcher.resize(*width, *height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::color::RED;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "# header\n\ntool rect\ndown 1 2\nmove 3.5 4 # trailing\nup 5 6 right\nleave\n";
        let commands = parse(script).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Tool(ToolKind::Rectangle),
                Command::Down(MouseButton::Left, Point::new(1.0, 2.0)),
                Command::Move(Point::new(3.5, 4.0)),
                Command::Up(MouseButton::Right, Point::new(5.0, 6.0)),
                Command::Leave,
            ]
        );
    }

    #[test]
    fn parses_key_specs() {
        assert_eq!(
            parse_line("key Ctrl+Shift+Z", 1).unwrap(),
            Some(Command::Key(vec![Key::Ctrl, Key::Shift], Key::Char('Z')))
        );
        assert_eq!(
            parse_line("key Ctrl++", 1).unwrap(),
            Some(Command::Key(vec![Key::Ctrl], Key::Char('+')))
        );
        assert_eq!(
            parse_line("key Escape", 1).unwrap(),
            Some(Command::Key(vec![], Key::Escape))
        );
        assert!(parse_line("key Z+Ctrl", 1).is_err());
        assert!(parse_line("key F13", 1).is_err());
    }

    #[test]
    fn color_accepts_functional_syntax() {
        assert_eq!(
            parse_line("color rgb(255, 0, 0)", 1).unwrap(),
            Some(Command::Color(RED))
        );
        assert_eq!(parse_line("color red", 1).unwrap(), Some(Command::Color(RED)));
        assert_eq!(
            parse_line("color #ff0000 # warm", 1).unwrap(),
            Some(Command::Color(RED))
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse("undo\nfly 1 2\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.to_string().contains("unknown command 'fly'"));

        let err = parse("down 1\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse("redo\nresize -4 10\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn run_draws_and_undoes() {
        let mut dispatcher = InputDispatcher::from_config(60, 60, &Config::default()).unwrap();
        let commands = parse(
            "tool line\nwidth 4\ndown 5 30\nmove 30 30\nup 55 30\ndown 30 5\nup 30 55\nkey Ctrl+Z\n",
        )
        .unwrap();
        run(&mut dispatcher, &commands);

        let history = dispatcher.canvas().history();
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 1);
        let pixels = dispatcher.canvas().export_pixels().unwrap();
        assert_eq!(pixels.pixel(15, 30), Some([0, 0, 0, 255]));
        assert_eq!(pixels.pixel(30, 15), Some([255, 255, 255, 255]));
    }

    #[test]
    fn blur_forgets_modifiers_held_across_lines() {
        let mut dispatcher = InputDispatcher::from_config(40, 40, &Config::default()).unwrap();
        let commands = parse("down 5 5
up 30 30
blur
key z
").unwrap();
        assert_eq!(commands[2], Command::Blur);

        dispatcher.on_key_press(Key::Ctrl);
        run(&mut dispatcher, &commands);
        assert_eq!(dispatcher.canvas().history().cursor(), 1);
        assert!(parse_line("blur now", 1).is_err());
    }
}
