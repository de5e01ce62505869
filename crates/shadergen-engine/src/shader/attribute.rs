use crate::backend::GraphicsBackend;
use crate::error::{EngineError, EngineResult};

use super::LinkedProgram;

/// Attribute name used when the vertex source declares none we can find.
pub const DEFAULT_ATTRIBUTE: &str = "position";

/// Outcome of the static attribute scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeResolution {
    /// Found an `attribute vec2 <name>;` declaration.
    Declared(String),
    /// Nothing matched; the fallback name is used and may fail to bind later.
    Fallback(String),
}

impl AttributeResolution {
    pub fn name(&self) -> &str {
        match self {
            AttributeResolution::Declared(name) | AttributeResolution::Fallback(name) => name,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AttributeResolution::Fallback(_))
    }

    /// Human-readable warning for the fallback case.
    pub fn warning(&self) -> Option<String> {
        match self {
            AttributeResolution::Declared(_) => None,
            AttributeResolution::Fallback(name) => Some(format!(
                "could not find a vertex attribute declaration in the shader, falling back to \
                 '{name}'; declare `attribute vec2 my_name;` in your vertex shader"
            )),
        }
    }
}

/// Picks the attribute to feed the quad's positions into.
///
/// Best-effort text scan, not a GLSL parse: it recognizes
/// `attribute [lowp|mediump|highp] vec2 <ident>;` outside comments and
/// returns the first match. Declarations written any other way (GLSL 3.x
/// `in vec2 ...`, `layout(...)` qualifiers, several names in one statement,
/// macros) are not seen and yield [`AttributeResolution::Fallback`].
pub fn resolve_attribute(vertex_source: &str, fallback: &str) -> AttributeResolution {
    match find_attribute_declaration(vertex_source) {
        Some(name) => AttributeResolution::Declared(name.to_string()),
        None => AttributeResolution::Fallback(fallback.to_string()),
    }
}

/// Returns the identifier of the first 2-component float vertex attribute.
pub fn find_attribute_declaration(source: &str) -> Option<&str> {
    let tokens: Vec<Token<'_>> = Scanner::new(source).collect();

    tokens.iter().enumerate().find_map(|(i, tok)| {
        if *tok != Token::Ident("attribute") {
            return None;
        }
        let mut rest = &tokens[i + 1..];
        if let [Token::Ident(q), tail @ ..] = rest {
            if matches!(*q, "lowp" | "mediump" | "highp") {
                rest = tail;
            }
        }
        match rest {
            [Token::Ident("vec2"), Token::Ident(name), Token::Semicolon, ..] => Some(*name),
            _ => None,
        }
    })
}

/// Resolved per-vertex input of a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub name: String,
    pub location: u32,
}

/// Looks `name` up in `program`. A missing attribute is fatal for the build.
pub fn bind_attribute<B: GraphicsBackend>(
    backend: &B,
    program: &LinkedProgram<B>,
    name: &str,
) -> EngineResult<AttributeBinding> {
    match backend.attrib_location(program.handle(), name) {
        Some(location) => Ok(AttributeBinding { name: name.to_string(), location }),
        None => Err(EngineError::AttributeNotFound { name: name.to_string() }),
    }
}

// ── scanner ───────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Token<'s> {
    Ident(&'s str),
    Semicolon,
    Other,
}

struct Scanner<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Scanner<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            let at = self.pos;
            let rest = &self.src[at..];
            if rest.starts_with("//") {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else if rest.starts_with("/*") {
                // Unterminated block comments swallow the rest of the input.
                self.pos = rest[2..]
                    .find("*/")
                    .map_or(self.src.len(), |i| at + 2 + i + 2);
            } else {
                break;
            }
        }
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Token<'s>> {
        self.skip_whitespace_and_comments();

        let src = self.src;
        let start = self.pos;
        match self.advance()? {
            ';' => Some(Token::Semicolon),
            c if c.is_ascii_alphabetic() || c == '_' => {
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                    self.advance();
                }
                Some(Token::Ident(&src[start..self.pos]))
            }
            c if c.is_ascii_digit() => {
                // Swallow the whole literal so `1e2x` never reads as an identifier.
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.') {
                    self.advance();
                }
                Some(Token::Other)
            }
            _ => Some(Token::Other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_declared_attribute() {
        let src = "attribute vec2 a_pos;\nvoid main() { gl_Position = vec4(a_pos, 0.0, 1.0); }";
        assert_eq!(
            resolve_attribute(src, DEFAULT_ATTRIBUTE),
            AttributeResolution::Declared("a_pos".into())
        );
    }

    #[test]
    fn falls_back_without_declaration() {
        let src = "void main() { gl_Position = vec4(0.0); }";
        let res = resolve_attribute(src, DEFAULT_ATTRIBUTE);
        assert!(res.is_fallback());
        assert_eq!(res.name(), "position");
        assert!(res.warning().is_some_and(|w| w.contains("attribute vec2")));
    }

    #[test]
    fn first_match_wins() {
        let src = "attribute vec2 first;\nattribute vec2 second;";
        assert_eq!(find_attribute_declaration(src), Some("first"));
    }

    #[test]
    fn skips_other_vector_widths() {
        let src = "attribute vec3 normal;\nattribute vec2 uv;";
        assert_eq!(find_attribute_declaration(src), Some("uv"));
    }

    #[test]
    fn accepts_precision_qualifier() {
        assert_eq!(find_attribute_declaration("attribute highp vec2 p;"), Some("p"));
    }

    #[test]
    fn tolerates_extra_whitespace() {
        assert_eq!(find_attribute_declaration("attribute\n\tvec2   coord ;"), Some("coord"));
    }

    #[test]
    fn ignores_commented_declarations() {
        let src = "// attribute vec2 old;\n/* attribute vec2 older; */\nattribute vec2 current;";
        assert_eq!(find_attribute_declaration(src), Some("current"));
    }

    #[test]
    fn modern_in_qualifier_is_not_recognized() {
        let src = "#version 300 es\nin vec2 a_pos;\nvoid main() {}";
        assert_eq!(find_attribute_declaration(src), None);
    }

    #[test]
    fn attribute_must_be_whole_word() {
        assert_eq!(find_attribute_declaration("myattribute vec2 p;"), None);
    }

    #[test]
    fn identifier_must_be_terminated() {
        assert_eq!(find_attribute_declaration("attribute vec2 p"), None);
        assert_eq!(find_attribute_declaration("attribute vec2 p, q;"), None);
    }

    #[test]
    fn unterminated_block_comment_hides_rest() {
        assert_eq!(find_attribute_declaration("/* attribute vec2 p;"), None);
    }
}
