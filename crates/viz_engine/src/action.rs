//! Spec text → [`Action`].
//!
//! A spec is a whitespace-separated list of commands, each either a bare
//! name (`bar`) or a name with arguments (`x(region)`, `title('Sales, 2024')`).
//! Arguments are bare words or quoted with `'` or `"`. Inside quotes a
//! backslash escapes the quote character or another backslash; any other
//! backslash is literal.

use crate::error::{EngineError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Fields every dataset implicitly has.
pub const SYNTHETIC_FIELDS: [&str; 2] = ["#count", "#row"];

pub fn is_synthetic(field: &str) -> bool {
    SYNTHETIC_FIELDS.contains(&field)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Point,
    Bar,
    Line,
    Area,
    Text,
}

impl Element {
    pub fn name(self) -> &'static str {
        match self {
            Element::Point => "point",
            Element::Bar => "bar",
            Element::Line => "line",
            Element::Area => "area",
            Element::Text => "text",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "point" => Some(Element::Point),
            "bar" => Some(Element::Bar),
            "line" => Some(Element::Line),
            "area" => Some(Element::Area),
            "text" => Some(Element::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    X,
    Y,
    Color,
    Size,
    Label,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::X => "x",
            Role::Y => "y",
            Role::Color => "color",
            Role::Size => "size",
            Role::Label => "label",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Role::X),
            "y" => Some(Role::Y),
            "color" => Some(Role::Color),
            "size" => Some(Role::Size),
            "label" => Some(Role::Label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Element(Element),
    Encode { role: Role, fields: Vec<String> },
    Filter(Vec<String>),
    Data(String),
    Title(String),
    Style(String),
}

/// A parsed spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    commands: Vec<Command>,
}

impl Action {
    pub fn parse(text: &str) -> Result<Action> {
        Parser { src: text, pos: 0 }.parse()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Reference given to `data(...)`, if any.
    pub fn data_ref(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            Command::Data(r) => Some(r.as_str()),
            _ => None,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            Command::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn element(&self) -> Option<Element> {
        self.commands.iter().find_map(|c| match c {
            Command::Element(e) => Some(*e),
            _ => None,
        })
    }

    /// Every field the spec refers to, in first-use order, without repeats.
    pub fn fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for cmd in &self.commands {
            let names = match cmd {
                Command::Encode { fields, .. } | Command::Filter(fields) => fields,
                _ => continue,
            };
            for name in names {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// Copy with field references renamed through `map`; unmapped names stay.
    pub fn rename_fields(&self, map: &HashMap<String, String>) -> Action {
        let rename = |fields: &[String]| -> Vec<String> {
            fields
                .iter()
                .map(|f| map.get(f).cloned().unwrap_or_else(|| f.clone()))
                .collect()
        };
        let commands = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                Command::Encode { role, fields } => Command::Encode {
                    role: *role,
                    fields: rename(fields),
                },
                Command::Filter(fields) => Command::Filter(rename(fields)),
                other => other.clone(),
            })
            .collect();
        Action { commands }
    }

    /// Copy with an existing `data(...)` pointed at `reference`.
    pub fn with_data(&self, reference: &str) -> Action {
        let commands = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                Command::Data(_) => Command::Data(reference.to_string()),
                other => other.clone(),
            })
            .collect();
        Action { commands }
    }
}

// ── Canonical text form ─────────────────────────────────────────────

fn write_arg(f: &mut fmt::Formatter<'_>, arg: &str) -> fmt::Result {
    let bare = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_#.-:/".contains(c));
    if bare {
        f.write_str(arg)
    } else if !arg.contains(['\'', '\\']) {
        write!(f, "'{arg}'")
    } else if !arg.contains(['"', '\\']) {
        write!(f, "\"{arg}\"")
    } else {
        let escaped = arg.replace('\\', "\\\\").replace('\'', "\\'");
        write!(f, "'{escaped}'")
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[String]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_arg(f, arg)?;
    }
    f.write_str(")")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Element(e) => f.write_str(e.name()),
            Command::Encode { role, fields } => write_call(f, role.name(), fields),
            Command::Filter(fields) => write_call(f, "filter", fields),
            Command::Data(r) => write_call(f, "data", std::slice::from_ref(r)),
            Command::Title(t) => write_call(f, "title", std::slice::from_ref(t)),
            Command::Style(s) => write_call(f, "style", std::slice::from_ref(s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

// ── Parser ──────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn parse(mut self) -> Result<Action> {
        let mut commands = Vec::new();
        let (mut data_seen, mut element_seen) = (false, false);
        loop {
            self.skip_ws();
            let Some(c) = self.peek() else { break };
            let start = self.pos;
            let name = self.ident(c)?;
            let args = if self.peek() == Some('(') {
                self.bump();
                self.args()?
            } else {
                Vec::new()
            };
            let cmd = command(start, name, args)?;
            match cmd {
                Command::Data(_) if data_seen => {
                    return Err(EngineError::parse(start, "only one data(...) allowed"))
                }
                Command::Data(_) => data_seen = true,
                Command::Element(_) if element_seen => {
                    return Err(EngineError::parse(start, "only one element allowed"))
                }
                Command::Element(_) => element_seen = true,
                _ => {}
            }
            commands.push(cmd);
        }
        if commands.is_empty() {
            return Err(EngineError::parse(0, "empty spec"));
        }
        Ok(Action { commands })
    }

    fn ident(&mut self, first: char) -> Result<&'a str> {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        if self.pos == start {
            return Err(EngineError::parse(start, format!("unexpected '{first}'")));
        }
        Ok(&src[start..self.pos])
    }

    fn args(&mut self) -> Result<Vec<String>> {
        let open = self.pos - 1;
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(EngineError::parse(open, "unclosed '('")),
                Some(')') if args.is_empty() => {
                    self.bump();
                    return Ok(args);
                }
                Some(q @ ('\'' | '"')) => {
                    self.bump();
                    args.push(self.quoted(q)?);
                }
                Some(_) => args.push(self.bare()?),
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(args),
                Some(c) => {
                    return Err(EngineError::parse(
                        self.pos - c.len_utf8(),
                        format!("expected ',' or ')', found '{c}'"),
                    ))
                }
                None => return Err(EngineError::parse(open, "unclosed '('")),
            }
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => match self.peek() {
                    Some(next) if next == quote || next == '\\' => {
                        self.bump();
                        out.push(next);
                    }
                    _ => out.push('\\'),
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(EngineError::parse(start - 1, "unterminated quote"))
    }

    fn bare(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                ',' | ')' => break,
                '(' | '\'' | '"' => {
                    return Err(EngineError::parse(self.pos, format!("unexpected '{c}' in argument")))
                }
                _ => {
                    self.bump();
                }
            }
        }
        let arg = self.src[start..self.pos].trim();
        if arg.is_empty() {
            return Err(EngineError::parse(start, "empty argument"));
        }
        Ok(arg.to_string())
    }
}

fn single(pos: usize, name: &str, args: Vec<String>) -> Result<String> {
    let [arg]: [String; 1] = args
        .try_into()
        .map_err(|_| EngineError::parse(pos, format!("'{name}' takes exactly one argument")))?;
    Ok(arg)
}

fn command(pos: usize, name: &str, args: Vec<String>) -> Result<Command> {
    if let Some(element) = Element::from_name(name) {
        if !args.is_empty() {
            return Err(EngineError::parse(pos, format!("'{name}' takes no arguments")));
        }
        return Ok(Command::Element(element));
    }
    if let Some(role) = Role::from_name(name) {
        if args.is_empty() {
            return Err(EngineError::parse(pos, format!("'{name}' needs at least one field")));
        }
        return Ok(Command::Encode { role, fields: args });
    }
    match name {
        "filter" if args.is_empty() => Err(EngineError::parse(pos, "'filter' needs at least one field")),
        "filter" => Ok(Command::Filter(args)),
        "data" => Ok(Command::Data(single(pos, name, args)?)),
        "title" => Ok(Command::Title(single(pos, name, args)?)),
        "style" => Ok(Command::Style(single(pos, name, args)?)),
        _ => Err(EngineError::parse(pos, format!("unknown command '{name}'"))),
    }
}
