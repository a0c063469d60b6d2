use std::io::{self, Write};

use translation::{Language, ParseError};

pub fn input(prompt: &str) -> io::Result<String> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

/// Like [`input`], an empty reply keeps `current`.
pub fn input_or(prompt: &str, current: &str) -> io::Result<String> {
    let line = input(&format!("{prompt} [{current}]: "))?;
    let line = line.trim();
    Ok(if line.is_empty() {
        current.to_owned()
    } else {
        line.to_owned()
    })
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Languages separated by commas or spaces, e.g. `english, vi de`.
pub fn parse_languages(text: &str) -> Result<Vec<Language>, ParseError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_lists() {
        assert_eq!(
            parse_languages("english, vi  German").unwrap(),
            vec![Language::English, Language::Vietnamese, Language::German]
        );
        assert!(parse_languages("").unwrap().is_empty());
        assert_eq!(
            parse_languages("spanish,elvish"),
            Err(ParseError::UnknownLanguage("elvish".to_owned()))
        );
    }

    #[test]
    fn yes_and_no() {
        assert_eq!(str_to_bool("Yes\n".to_owned()), Some(true));
        assert_eq!(str_to_bool(" n ".to_owned()), Some(false));
        assert_eq!(str_to_bool("maybe".to_owned()), None);
    }
}
