//! Java formatting rules
//!
//! Braces drive the indentation: `{` indents the following lines by one shift width and
//! `}` takes it back, on its own line when it starts the line. Block comment continuation
//! lines are realigned under the opening `/*`.

use super::writer::{FormatLayer, LineCtx};
use crate::scanfmt::lexing::{JavaSyntax, JavaTokenId, Operator};
use crate::scanfmt::token::Token;

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaFormatLayer;

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

impl FormatLayer for JavaFormatLayer {
    type Syntax = JavaSyntax;

    fn create_syntax(&self) -> JavaSyntax {
        JavaSyntax::new()
    }

    fn is_initial_whitespace(&self, token: &Token) -> bool {
        token.id == JavaTokenId::Whitespace.id()
    }

    fn format_token(&mut self, line: &mut LineCtx<'_>, token: &Token, text: &str) {
        let options = line.options();
        match JavaTokenId::from_id(token.id) {
            Some(JavaTokenId::Operator) => match token.helper.and_then(Operator::from_code) {
                Some(Operator::LBrace) => {
                    if options.add_newline_before_compound_bracket && line.has_content() {
                        line.break_line();
                    }
                    line.push_str(text);
                    line.set_next_indent(line.next_indent() + options.shift_width);
                }
                Some(Operator::RBrace) => {
                    if line.is_first_token() {
                        line.set_indent(line.indent().saturating_sub(options.shift_width));
                    }
                    line.set_next_indent(line.next_indent().saturating_sub(options.shift_width));
                    line.push_str(text);
                }
                Some(Operator::LParen) => {
                    if options.add_space_before_parenthesis
                        && line.text().chars().last().is_some_and(is_word_char)
                    {
                        line.push(' ');
                    }
                    line.push_str(text);
                }
                _ => line.push_str(text),
            },
            Some(JavaTokenId::BlockComment) if line.is_first_token() && !text.starts_with("/*") => {
                let body = text.trim_start_matches([' ', '\t']);
                if options.add_space_in_block_comments {
                    line.push(' ');
                }
                if options.add_star_in_block_comments && !body.starts_with('*') {
                    line.push_str("* ");
                }
                line.push_str(body);
            }
            _ => line.push_str(text),
        }
    }
}
