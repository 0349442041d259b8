use serde::{Deserialize, Serialize};
use std::fmt;

/// An unbound type expression as written in source, e.g. `Task<List<Customer>>?`.
///
/// Anything the parser does not understand (function pointers, generic
/// arguments on a qualifier segment) is kept verbatim as [`TypeSyntax::Opaque`]
/// so it can still be reproduced in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeSyntax {
    Named {
        /// Possibly qualified name without type arguments (`System.IO.Stream`)
        name: String,
        args: Vec<TypeSyntax>,
        /// Nullable, array and pointer markers following the name (`?`, `[]`, `[,]`, `*`)
        suffix: String,
    },
    /// `(int Id, string Name)`, at least two elements
    Tuple {
        elements: Vec<TupleElement>,
        suffix: String,
    },
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub ty: TypeSyntax,
    pub name: Option<String>,
}

impl TypeSyntax {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let mut cursor = Cursor::new(trimmed);
        match cursor.parse_type() {
            Some(syntax) if cursor.at_end() => syntax,
            _ => TypeSyntax::Opaque(trimmed.to_string()),
        }
    }

    pub fn named(name: impl Into<String>, args: Vec<TypeSyntax>) -> Self {
        TypeSyntax::Named {
            name: name.into(),
            args,
            suffix: String::new(),
        }
    }

    /// The rightmost segment of the name (`Stream` for `System.IO.Stream`)
    pub fn simple_name(&self) -> &str {
        match self {
            TypeSyntax::Named { name, .. } => name.rsplit('.').next().unwrap_or(name),
            TypeSyntax::Tuple { .. } => "",
            TypeSyntax::Opaque(text) => text,
        }
    }

    pub fn args(&self) -> &[TypeSyntax] {
        match self {
            TypeSyntax::Named { args, .. } => args,
            TypeSyntax::Tuple { .. } | TypeSyntax::Opaque(_) => &[],
        }
    }

    pub fn arity(&self) -> usize {
        self.args().len()
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Named { name, args, suffix } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "<{}>", rendered.join(", "))?;
                }
                write!(f, "{suffix}")
            }
            TypeSyntax::Tuple { elements, suffix } => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "({}){suffix}", rendered.join(", "))
            }
            TypeSyntax::Opaque(text) => write!(f, "{text}"),
        }
    }
}

impl fmt::Display for TupleElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {name}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

impl From<String> for TypeSyntax {
    fn from(value: String) -> Self {
        TypeSyntax::parse(&value)
    }
}

impl From<&str> for TypeSyntax {
    fn from(value: &str) -> Self {
        TypeSyntax::parse(value)
    }
}

impl From<TypeSyntax> for String {
    fn from(value: TypeSyntax) -> Self {
        value.to_string()
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos == self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        let mut chars = self.rest().char_indices();
        match chars.next() {
            Some((_, c)) if c == '@' || c == '_' || c.is_alphabetic() => {}
            _ => return None,
        }
        let mut end = self.rest().len();
        for (offset, c) in chars {
            if !(c == '_' || c.is_alphanumeric()) {
                end = offset;
                break;
            }
        }
        self.pos += end;
        Some(&self.src[start..self.pos])
    }

    fn parse_type(&mut self) -> Option<TypeSyntax> {
        if self.eat('(') {
            return self.parse_tuple();
        }
        self.skip_ws();
        if self.rest().starts_with("global::") {
            self.pos += "global::".len();
        }

        let mut name = self.ident()?.to_string();
        loop {
            self.skip_ws();
            if self.rest().starts_with("::") {
                // alias::Name, the alias carries no namespace information we can use
                self.pos += 2;
                name = self.ident()?.to_string();
            } else if self.peek() == Some('.') {
                self.pos += 1;
                let segment = self.ident()?;
                name.push('.');
                name.push_str(segment);
            } else {
                break;
            }
        }

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return None;
            }
        }

        let suffix = self.parse_suffix()?;
        Some(TypeSyntax::Named { name, args, suffix })
    }

    /// Elements after the opening `(`
    fn parse_tuple(&mut self) -> Option<TypeSyntax> {
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            let name = self.ident().map(str::to_string);
            elements.push(TupleElement { ty, name });
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                break;
            }
            return None;
        }
        if elements.len() < 2 {
            return None;
        }
        let suffix = self.parse_suffix()?;
        Some(TypeSyntax::Tuple { elements, suffix })
    }

    /// Nullable, array and pointer markers
    fn parse_suffix(&mut self) -> Option<String> {
        let mut suffix = String::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('?') => {
                    self.pos += 1;
                    suffix.push('?');
                }
                Some('*') => {
                    self.pos += 1;
                    suffix.push('*');
                }
                Some('[') => {
                    self.pos += 1;
                    suffix.push('[');
                    loop {
                        self.skip_ws();
                        match self.peek() {
                            Some(',') => {
                                self.pos += 1;
                                suffix.push(',');
                            }
                            Some(']') => {
                                self.pos += 1;
                                suffix.push(']');
                                break;
                            }
                            _ => return None,
                        }
                    }
                }
                _ => break,
            }
        }
        Some(suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let syntax = TypeSyntax::parse("string");
        assert_eq!(syntax, TypeSyntax::named("string", vec![]));
        assert_eq!(syntax.simple_name(), "string");
    }

    #[test]
    fn test_parse_nested_generics() {
        let syntax = TypeSyntax::parse("Task< Dictionary<string,List<int>> >");
        assert_eq!(syntax.simple_name(), "Task");
        assert_eq!(syntax.arity(), 1);
        assert_eq!(syntax.args()[0].arity(), 2);
        assert_eq!(syntax.to_string(), "Task<Dictionary<string, List<int>>>");
    }

    #[test]
    fn test_parse_qualified_and_global_prefix() {
        let syntax = TypeSyntax::parse("global::System.IO.Stream");
        assert_eq!(syntax.simple_name(), "Stream");
        assert_eq!(syntax, TypeSyntax::named("System.IO.Stream", vec![]));
        assert_eq!(syntax.to_string(), "System.IO.Stream");
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(TypeSyntax::parse("int?").to_string(), "int?");
        assert_eq!(TypeSyntax::parse("string[]").to_string(), "string[]");
        assert_eq!(TypeSyntax::parse("int[ , ]").to_string(), "int[,]");
        assert_eq!(
            TypeSyntax::parse("List<string?>?").to_string(),
            "List<string?>?"
        );
    }

    #[test]
    fn test_parse_tuples() {
        let syntax = TypeSyntax::parse("Task<(int Id, string Name)>");
        assert_eq!(syntax.simple_name(), "Task");
        assert_eq!(syntax.arity(), 1);
        assert_eq!(
            syntax.args()[0],
            TypeSyntax::Tuple {
                elements: vec![
                    TupleElement {
                        ty: TypeSyntax::named("int", vec![]),
                        name: Some("Id".to_string()),
                    },
                    TupleElement {
                        ty: TypeSyntax::named("string", vec![]),
                        name: Some("Name".to_string()),
                    },
                ],
                suffix: String::new(),
            }
        );
        assert_eq!(syntax.to_string(), "Task<(int Id, string Name)>");

        let nested = TypeSyntax::parse("Task<IEnumerable<( int ,List<string> )>>");
        assert_eq!(nested.arity(), 1);
        assert_eq!(nested.to_string(), "Task<IEnumerable<(int, List<string>)>>");
        assert_eq!(TypeSyntax::parse("(int, int)[]?").to_string(), "(int, int)[]?");
    }

    fn is_opaque(text: &str) -> bool {
        matches!(TypeSyntax::parse(text), TypeSyntax::Opaque(_))
    }

    #[test]
    fn test_unsupported_shapes_are_opaque() {
        assert!(is_opaque("Outer<int>.Inner"));
        assert!(is_opaque("Task<int"));
        assert!(is_opaque("(int)"));
        assert!(is_opaque("(int, string"));
        assert!(is_opaque(""));
        assert_eq!(
            TypeSyntax::parse("  delegate*<int, void>  ").to_string(),
            "delegate*<int, void>"
        );
    }

    #[test]
    fn test_serde_as_string() {
        let syntax: TypeSyntax = serde_json::from_str("\"Task<Customer>\"").unwrap();
        assert_eq!(syntax.simple_name(), "Task");
        assert_eq!(serde_json::to_string(&syntax).unwrap(), "\"Task<Customer>\"");
    }
}
