//! Manifest files listing the packages a project wants.
//!
//! A manifest is a small declarative file, one statement per line:
//!
//! ```text
//! source "https://packages.example.com"
//!
//! package "rake", ">= 10.0", "< 12"
//! package "json", require: false
//!
//! platform :native do
//!   package "ffi", "~> 1.9"
//! end
//!
//! group :test do
//!   package "minitest"
//! end
//! ```
//!
//! Interpreting a manifest never runs any code, the only effect is calling
//! [`DeclarationSink::declare()`] once per active `package` line.
//! - `source` is accepted and ignored.
//! - Trailing `key: value` options on a `package` line are ignored.
//! - A `platform` (or `platforms`) block is only read when one of its platforms is `:native`.
//! - A `group` block is skipped entirely.
//!
//! Lines inside a skipped block are never checked, only `do` and `end` are followed to find where it closes.

use thiserror::Error;

use crate::package::Requirement;

/// The platform name whose `platform` blocks are read.
pub const NATIVE_PLATFORM: &str = "native";

/// Receives the packages declared by a manifest.
pub trait DeclarationSink {
	fn declare(&mut self, name: String, requirement: Requirement);
}

impl DeclarationSink for Vec<(String, Requirement)> {
	fn declare(&mut self, name: String, requirement: Requirement) {
		self.push((name, requirement));
	}
}

#[derive(Debug, Error)]
pub enum ManifestError {
	#[error("line {line}: unterminated string")]
	UnterminatedString { line: usize },
	#[error("line {line}: unknown directive `{directive}`")]
	UnknownDirective { line: usize, directive: String },
	#[error("line {line}: invalid requirement: {message}")]
	InvalidRequirement { line: usize, message: String },
	#[error("line {line}: {message}")]
	Syntax { line: usize, message: String },
	#[error("line {line}: `end` without an open block")]
	UnbalancedEnd { line: usize },
	#[error("block opened on line {line} is never closed")]
	UnclosedBlock { line: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
	Word(String),
	Str(String),
	Symbol(String),
	/// `name:` as used by keyword options.
	Key(String),
	Comma,
	/// `=>`
	Arrow,
	Other(char),
}

fn is_word_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(text: &str, line: usize) -> Result<Vec<Token>, ManifestError> {
	let mut tokens = Vec::<Token>::new();
	let mut chars = text.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'#' => break,
			c if c.is_whitespace() => {},
			'"' | '\'' => {
				let mut s = String::new();
				let mut terminated = false;
				while let Some(c2) = chars.next() {
					match c2 {
						'\\' if c == '"' => {
							if let Some(escaped) = chars.next() { s.push(escaped) }
						},
						c2 if c2 == c => { terminated = true; break },
						c2 => s.push(c2),
					}
				}
				if !terminated {
					return Err(ManifestError::UnterminatedString { line })
				}
				tokens.push(Token::Str(s));
			},
			':' if chars.peek().is_some_and(|n| is_word_char(*n)) => {
				let mut s = String::new();
				while let Some(n) = chars.next_if(|n| is_word_char(*n)) { s.push(n) }
				tokens.push(Token::Symbol(s));
			},
			c if is_word_char(c) => {
				let mut s = String::from(c);
				while let Some(n) = chars.next_if(|n| is_word_char(*n) || *n == '?' || *n == '!') { s.push(n) }
				if chars.next_if_eq(&':').is_some() {
					tokens.push(Token::Key(s));
				} else {
					tokens.push(Token::Word(s));
				}
			},
			',' => tokens.push(Token::Comma),
			'=' if chars.next_if_eq(&'>').is_some() => tokens.push(Token::Arrow),
			c => tokens.push(Token::Other(c)),
		}
	}

	Ok(tokens)
}

/// Splits arguments on commas, stopping at the first keyword option.
///
/// Returns the positional arguments, options are ignored.
fn positional_arguments(args: &[Token], line: usize) -> Result<Vec<&Token>, ManifestError> {
	let mut positional = Vec::<&Token>::new();
	if args.is_empty() {
		return Ok(positional)
	}

	for group in args.split(|t| *t == Token::Comma) {
		match group {
			[] => return Err(ManifestError::Syntax { line, message: "missing argument".to_string() }),
			[Token::Key(_), ..] | [_, Token::Arrow, ..] => break,
			[single] => positional.push(single),
			_ => return Err(ManifestError::Syntax { line, message: "expected a comma between arguments".to_string() }),
		}
	}

	Ok(positional)
}

fn symbol_arguments(args: &[Token], line: usize) -> Result<Vec<&str>, ManifestError> {
	positional_arguments(args, line)?
		.into_iter()
		.map(|t| match t {
			Token::Symbol(s) => Ok(s.as_str()),
			_ => Err(ManifestError::Syntax { line, message: "expected a symbol such as `:native`".to_string() }),
		})
		.collect()
}

struct Block {
	line: usize,
	active: bool,
}

/// Interprets a manifest, declaring its packages into `sink`.
///
/// # Errors
/// A [`ManifestError`] naming the offending line. Packages on earlier lines have already been declared.
pub fn interpret(source: &str, sink: &mut impl DeclarationSink) -> Result<(), ManifestError> {
	let mut blocks = Vec::<Block>::new();

	for (i, text) in source.lines().enumerate() {
		let line = i + 1;
		let tokens = tokenize(text, line)?;
		let Some((first, rest)) = tokens.split_first() else { continue };

		let active = blocks.last().map_or(true, |b| b.active);
		let (args, opens_block) = match rest.split_last() {
			Some((Token::Word(w), args)) if w == "do" => (args, true),
			_ => (rest, false),
		};

		/* Skipped blocks are never evaluated, only their nesting is followed */
		if !active {
			match first {
				Token::Word(w) if w == "end" => { blocks.pop(); },
				_ if opens_block => blocks.push(Block { line, active: false }),
				_ => log::trace!("Skipping line {} in inactive block", line),
			}
			continue;
		}

		let directive = match first {
			Token::Word(w) => w.as_str(),
			_ => return Err(ManifestError::Syntax { line, message: "expected a directive".to_string() }),
		};

		let no_block = |opens_block: bool| if opens_block {
			Err(ManifestError::Syntax { line, message: format!("`{}` does not take a block", directive) })
		} else {
			Ok(())
		};

		match directive {
			"end" => {
				no_block(opens_block)?;
				if !args.is_empty() {
					return Err(ManifestError::Syntax { line, message: "unexpected arguments after `end`".to_string() })
				}
				blocks.pop().ok_or(ManifestError::UnbalancedEnd { line })?;
			},
			"source" => {
				no_block(opens_block)?;
				match positional_arguments(args, line)?.as_slice() {
					[Token::Str(url)] => log::trace!("Ignoring source {}", url),
					_ => return Err(ManifestError::Syntax { line, message: "`source` expects a single string".to_string() }),
				}
			},
			"package" => {
				no_block(opens_block)?;
				let positional = positional_arguments(args, line)?;
				let mut strings = Vec::<&str>::with_capacity(positional.len());
				for t in positional {
					match t {
						Token::Str(s) => strings.push(s),
						_ => return Err(ManifestError::Syntax { line, message: "`package` expects string arguments".to_string() }),
					}
				}
				let Some((name, requirements)) = strings.split_first() else {
					return Err(ManifestError::Syntax { line, message: "`package` expects a name".to_string() })
				};
				let requirement = Requirement::parse(requirements)
					.map_err(|e| ManifestError::InvalidRequirement { line, message: e.to_string() })?;

				sink.declare(name.to_string(), requirement);
			},
			"platform" | "platforms" => {
				let platforms = symbol_arguments(args, line)?;
				if platforms.is_empty() || !opens_block {
					return Err(ManifestError::Syntax { line, message: format!("`{}` expects platforms and a block", directive) })
				}
				blocks.push(Block { line, active: platforms.contains(&NATIVE_PLATFORM) });
			},
			"group" => {
				let groups = symbol_arguments(args, line)?;
				if opens_block {
					log::trace!("Skipping group {:?}", groups);
					blocks.push(Block { line, active: false });
				}
			},
			_ => return Err(ManifestError::UnknownDirective { line, directive: directive.to_string() }),
		}
	}

	match blocks.last() {
		Some(block) => Err(ManifestError::UnclosedBlock { line: block.line }),
		None => Ok(()),
	}
}
