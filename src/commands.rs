use crate::{
    due::TimeUnit,
    error::{Error, Result},
    types::TaskId,
};

use combine::error::ParseError;
use combine::parser::char::{char, digit, spaces, string};
use combine::{
    parser::choice::{choice, optional},
    parser::combinator::{attempt, from_str},
    parser::repeat::many1,
    parser::token::eof,
    stream::position,
    EasyParser, Parser, Stream,
};

/// Commands accepted on the task list screen.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ListCommand {
    New,
    /// Delete the given task, or the selected one when no id is given.
    Delete(Option<TaskId>),
    Quit,
}

/// Commands accepted on the create task screen.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CreateCommand {
    Add(TimeUnit, u32),
    Clear,
    Save,
    Back,
}

/// Matches `head` followed by the optional remainder of the word, so both
/// `d` and `delete` are accepted.
fn word<Input>(head: char, rest: &'static str) -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    char(head)
        .and(optional(attempt(string(rest))).silent())
        .map(|_| ())
}

fn number<Input, O>() -> impl Parser<Input, Output = O>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    O: std::str::FromStr,
    O::Err: std::fmt::Display,
{
    from_str(many1::<String, _, _>(digit()))
}

fn list_command<Input>() -> impl Parser<Input, Output = ListCommand>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let new = || word('n', "ew");
    let delete = || word('d', "elete");
    let quit = || word('q', "uit");

    choice((
        new().map(|_| ListCommand::New),
        delete()
            .skip(spaces().silent())
            .with(optional(number::<_, TaskId>()))
            .map(ListCommand::Delete),
        quit().map(|_| ListCommand::Quit),
    ))
    .skip(spaces().silent())
    .skip(eof())
}

fn time_unit<Input>() -> impl Parser<Input, Output = TimeUnit>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    choice((
        word('d', "ays").map(|_| TimeUnit::Days),
        word('h', "ours").map(|_| TimeUnit::Hours),
        word('m', "inutes").map(|_| TimeUnit::Minutes),
    ))
}

fn create_command<Input>() -> impl Parser<Input, Output = CreateCommand>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let add = (
        char('+').skip(spaces().silent()),
        number::<_, u32>().skip(spaces().silent()),
        time_unit(),
    )
        .map(|(_, amount, unit)| CreateCommand::Add(unit, amount));

    choice((
        add,
        word('c', "lear").map(|_| CreateCommand::Clear),
        word('s', "ave").map(|_| CreateCommand::Save),
        word('b', "ack").map(|_| CreateCommand::Back),
    ))
    .skip(spaces().silent())
    .skip(eof())
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

pub(crate) fn parse_list_command(input: &str) -> Result<ListCommand> {
    let input = normalize(input);
    let command = list_command()
        .easy_parse(position::Stream::new(input.as_str()))
        .map(|(command, _)| command)
        .map_err(|e| Error::Command(e.to_string()));
    command
}

pub(crate) fn parse_create_command(input: &str) -> Result<CreateCommand> {
    let input = normalize(input);
    let command = create_command()
        .easy_parse(position::Stream::new(input.as_str()))
        .map(|(command, _)| command)
        .map_err(|e| Error::Command(e.to_string()));
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_commands_accept_short_and_long_forms() {
        assert_eq!(parse_list_command("n").unwrap(), ListCommand::New);
        assert_eq!(parse_list_command("new").unwrap(), ListCommand::New);
        assert_eq!(parse_list_command("  QUIT ").unwrap(), ListCommand::Quit);
        assert_eq!(parse_list_command("q").unwrap(), ListCommand::Quit);
    }

    #[test]
    fn delete_takes_an_optional_id() {
        assert_eq!(parse_list_command("d").unwrap(), ListCommand::Delete(None));
        assert_eq!(
            parse_list_command("delete 42").unwrap(),
            ListCommand::Delete(Some(42))
        );
        assert_eq!(parse_list_command("d7").unwrap(), ListCommand::Delete(Some(7)));
    }

    #[test]
    fn list_rejects_unknown_and_trailing_input() {
        assert!(matches!(parse_list_command("frobnicate"), Err(Error::Command(_))));
        assert!(parse_list_command("delete abc").is_err());
        assert!(parse_list_command("new task").is_err());
        assert!(parse_list_command("").is_err());
    }

    #[test]
    fn create_add_parses_amount_and_unit() {
        assert_eq!(
            parse_create_command("+1d").unwrap(),
            CreateCommand::Add(TimeUnit::Days, 1)
        );
        assert_eq!(
            parse_create_command("+ 12 hours").unwrap(),
            CreateCommand::Add(TimeUnit::Hours, 12)
        );
        assert_eq!(
            parse_create_command("+90m").unwrap(),
            CreateCommand::Add(TimeUnit::Minutes, 90)
        );
    }

    #[test]
    fn create_words() {
        assert_eq!(parse_create_command("clear").unwrap(), CreateCommand::Clear);
        assert_eq!(parse_create_command("s").unwrap(), CreateCommand::Save);
        assert_eq!(parse_create_command("Back").unwrap(), CreateCommand::Back);
    }

    #[test]
    fn create_rejects_bad_offsets() {
        assert!(parse_create_command("+d").is_err());
        assert!(parse_create_command("+3y").is_err());
        assert!(parse_create_command("+99999999999m").is_err());
        assert!(parse_create_command("-1h").is_err());
    }
}
