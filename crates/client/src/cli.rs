use std::path::PathBuf;

use civil_codes_backend::models::resource::Category;
use civil_codes_backend::models::user::UserId;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::views::auth::AuthMode;
use crate::views::tabs::CategoryTabs;

#[derive(Debug, Parser)]
#[command(name = "civil-codes", version, about = "Browse and curate the Civil Codes catalog")]
pub struct Args {
    /// YAML configuration file
    #[arg(long, env = "CIVIL_CODES_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,
    /// Use the in-memory backend with demo data instead of Postgres
    #[arg(long)]
    pub memory: bool,
    /// Identity offered the manage actions, overriding the config file
    #[arg(long, env = "CIVIL_CODES_ADMIN_ID")]
    pub admin_id: Option<UserId>,
    /// Confirm deletes by typing "delete" instead of answering y/N
    #[arg(long)]
    pub typed_delete: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive catalog session (default)
    Run,
    /// Create types, tables and the origin admin user
    InitDb,
    /// Drop every catalog table and type
    DropDb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Link,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Auth {
        mode: AuthMode,
        alias: String,
        password: String,
    },
    Logout,
    Tab(Category),
    Search(String),
    Favorites,
    Favorite(usize),
    Open(usize),
    Delete(usize),
    Edit(usize),
    Set(EditField, String),
    Save,
    Cancel,
    Upload,
    Contribute,
    Refresh,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
login <alias> <password>   sign in
signup <alias> <password>  create an account
logout                     sign out
tab <n|category>           switch category
search [text]              filter by title or description
favorites                  toggle favorites only
fav <n>                    toggle favorite on row n
open <n>                   open the drive link of row n
delete <n>                 delete row n (admin)
edit <n>                   edit row n inline (admin)
set <title|description|link> <value>
save | cancel              finish the inline edit
upload                     fill and submit the upload form
contribute                 compose a contribution mail
refresh                    fetch the list again
quit";

fn position(arg: Option<&str>, usage: &'static str) -> Result<usize, ParseError> {
    arg.and_then(|a| a.parse().ok())
        .filter(|n| *n > 0)
        .ok_or(ParseError::Usage(usage))
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((line, ""));
        let mut args = rest.split_whitespace();
        let command = match head.to_ascii_lowercase().as_str() {
            "login" | "signup" => {
                let usage = "login|signup <alias> <password>";
                let (Some(alias), Some(password)) = (args.next(), args.next()) else {
                    return Err(ParseError::Usage(usage));
                };
                Self::Auth {
                    mode: if head.eq_ignore_ascii_case("login") {
                        AuthMode::SignIn
                    } else {
                        AuthMode::SignUp
                    },
                    alias: alias.to_string(),
                    password: password.to_string(),
                }
            }
            "logout" => Self::Logout,
            "tab" => Self::Tab(CategoryTabs::choose(rest).ok_or(ParseError::Usage(
                "tab <1|2|3|code|definition|formula>",
            ))?),
            "search" => Self::Search(rest.to_string()),
            "favorites" => Self::Favorites,
            "fav" => Self::Favorite(position(args.next(), "fav <n>")?),
            "open" => Self::Open(position(args.next(), "open <n>")?),
            "delete" => Self::Delete(position(args.next(), "delete <n>")?),
            "edit" => Self::Edit(position(args.next(), "edit <n>")?),
            "set" => {
                let usage = "set <title|description|link> <value>";
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                let field = match field {
                    "title" => EditField::Title,
                    "description" => EditField::Description,
                    "link" => EditField::Link,
                    _ => return Err(ParseError::Usage(usage)),
                };
                Self::Set(field, value.to_string())
            }
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "upload" => Self::Upload,
            "contribute" => Self::Contribute,
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(ParseError::Unknown(head.to_string())),
        };
        Ok(Some(command))
    }
}
