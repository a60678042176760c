use pest::Parser;
use pest_derive::Parser;

use super::template::TemplatePart;

#[derive(Parser)]
#[grammar = "templates/grammar.pest"]
struct TemplateParser;

/// Splits `text` into literal runs and placeholders. Adjacent literals,
/// including unescaped braces, are merged into one part.
pub fn parse(text: &str) -> Result<Vec<TemplatePart>, Box<pest::error::Error<Rule>>> {
	let mut parts = Vec::new();
	let mut literal = String::new();
	let Some(template) = TemplateParser::parse(Rule::template, text)?.next() else {
		return Ok(parts);
	};
	for pair in template.into_inner() {
		match pair.as_rule() {
			Rule::literal => literal.push_str(pair.as_str()),
			Rule::escaped_open => literal.push('{'),
			Rule::escaped_close => literal.push('}'),
			Rule::placeholder => {
				if !literal.is_empty() {
					parts.push(TemplatePart::Static(std::mem::take(&mut literal)));
				}
				let key = pair.into_inner().next().map(|key| key.as_str().to_string()).unwrap_or_default();
				parts.push(TemplatePart::Placeholder(key));
			}
			Rule::EOI => (),
			rule => unreachable!("unexpected top-level rule: {:?}", rule),
		}
	}
	if !literal.is_empty() {
		parts.push(TemplatePart::Static(literal));
	}
	Ok(parts)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn escapes_merge_into_literals() {
		assert_eq!(
			parse("echo {{x}} {old}").unwrap(),
			vec![
				TemplatePart::Static("echo {x} ".into()),
				TemplatePart::Placeholder("old".into()),
			]
		);
	}

	#[test]
	fn empty_text_has_no_parts() {
		assert_eq!(parse("").unwrap(), vec![]);
	}

	#[test]
	fn rejects_what_the_grammar_does_not_cover() {
		for text in ["{old", "old}", "{}", "{a b}", "{a-b}"] {
			assert!(parse(text).is_err(), "{text}");
		}
	}
}
