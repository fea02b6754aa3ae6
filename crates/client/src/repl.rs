use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use crate::cli::{EditField, ReplCommand, HELP};
use crate::notify::{Level, Toaster};
use crate::views::footer::contribution_mailto;
use crate::views::resource_list::{ConfirmDialog, TypedPhrase, DELETE_PHRASE};
use crate::views::shell::AppShell;

/// Line-oriented front end: one command per line, the screen is redrawn after each one.
pub struct Repl<R, W> {
    lines: Lines<R>,
    out: W,
    toaster: Toaster,
    launch_links: bool,
    typed_delete: bool,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, toaster: Toaster) -> Self {
        Self {
            lines: input.lines(),
            out,
            toaster,
            launch_links: false,
            typed_delete: false,
        }
    }

    /// Hand drive and mailto links to the desktop instead of only printing them.
    pub fn launch_links(mut self, launch: bool) -> Self {
        self.launch_links = launch;
        self
    }

    pub fn typed_delete(mut self, typed: bool) -> Self {
        self.typed_delete = typed;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(&mut self, shell: &mut AppShell) -> Result<()> {
        shell.mount().await;
        self.redraw(shell)?;
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            let command = match ReplCommand::parse(&line) {
                Ok(Some(ReplCommand::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
            };
            if command == ReplCommand::Help {
                writeln!(self.out, "{HELP}")?;
                continue;
            }
            self.execute(shell, command).await?;
            shell.sync_session().await;
            self.redraw(shell)?;
        }
        shell.unmount();
        Ok(())
    }

    async fn execute(&mut self, shell: &mut AppShell, command: ReplCommand) -> Result<()> {
        match command {
            ReplCommand::Auth {
                mode,
                alias,
                password,
            } => {
                shell.sign_in(mode, &alias, &password).await;
            }
            ReplCommand::Logout => shell.sign_out().await,
            ReplCommand::Tab(category) => shell.select_category(category).await,
            ReplCommand::Search(query) => shell.list_mut().set_search(query),
            ReplCommand::Favorites => shell.list_mut().toggle_show_favorites().await,
            ReplCommand::Refresh => {
                shell.list_mut().fetch().await;
            }
            ReplCommand::Favorite(n) => {
                if let Some(id) = self.row_id(shell, n) {
                    shell.list_mut().toggle_favorite(id).await;
                }
            }
            ReplCommand::Open(n) => {
                let link = shell
                    .list()
                    .visible_at(n)
                    .map(|r| r.resource.drive_link.clone());
                match link {
                    None => self.toaster.error(format!("No resource at position {n}")),
                    Some(None) => self.toaster.error("This resource has no drive link"),
                    Some(Some(link)) => self.launch(&link)?,
                }
            }
            ReplCommand::Delete(n) => {
                let Some(listed) = shell.list().visible_at(n).cloned() else {
                    self.toaster.error(format!("No resource at position {n}"));
                    return Ok(());
                };
                if !shell.list().ensure_can_delete() {
                    return Ok(());
                }
                let id = listed.resource.id;
                if self.typed_delete {
                    let prompt = format!(
                        "Type '{DELETE_PHRASE}' to remove \"{}\":",
                        listed.resource.title
                    );
                    let answer = self.ask(&prompt).await?.unwrap_or_default();
                    shell.list_mut().delete(id, &TypedPhrase(answer)).await;
                } else {
                    let prompt = format!(
                        "Are you sure you want to delete \"{}\"? [y/N]",
                        listed.resource.title
                    );
                    let answer = self.ask(&prompt).await?.unwrap_or_default();
                    let confirmed =
                        matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes");
                    shell
                        .list_mut()
                        .delete(id, &ConfirmDialog(|_: &str| confirmed))
                        .await;
                }
            }
            ReplCommand::Edit(n) => {
                if let Some(id) = self.row_id(shell, n) {
                    shell.list_mut().begin_edit(id);
                }
            }
            ReplCommand::Set(field, value) => match shell.list_mut().editing_mut() {
                Some(draft) => match field {
                    EditField::Title => draft.title = value,
                    EditField::Description => draft.description = value,
                    EditField::Link => draft.drive_link = value,
                },
                None => self.toaster.error("Nothing is being edited, use `edit <n>` first"),
            },
            ReplCommand::Save => {
                shell.list_mut().save_edit().await;
            }
            ReplCommand::Cancel => shell.list_mut().cancel_edit(),
            ReplCommand::Upload => self.upload(shell).await?,
            ReplCommand::Contribute => self.launch(&contribution_mailto())?,
            ReplCommand::Help | ReplCommand::Quit => {}
        }
        Ok(())
    }

    async fn upload(&mut self, shell: &mut AppShell) -> Result<()> {
        if shell.identity().is_some() && !shell.can_manage() {
            self.toaster
                .error("Only the administrator can upload, use `contribute` to send a PDF");
            return Ok(());
        }
        let link_prompt = if shell.form().drive_link_required() {
            "Google Drive Link *:"
        } else {
            "Google Drive Link:"
        };
        let prompts = [("Title *:", 0), ("Description:", 1), (link_prompt, 2)];
        for (prompt, field) in prompts {
            let current = match field {
                0 => shell.form().title.clone(),
                1 => shell.form().description.clone(),
                _ => shell.form().drive_link.clone(),
            };
            let prompt = if current.is_empty() {
                prompt.to_string()
            } else {
                format!("{prompt} [{current}]")
            };
            let Some(answer) = self.ask(&prompt).await? else {
                return Ok(());
            };
            if answer.is_empty() {
                continue;
            }
            let form = shell.form_mut();
            match field {
                0 => form.title = answer,
                1 => form.description = answer,
                _ => form.drive_link = answer,
            }
        }
        if shell.form_mut().submit().await {
            shell.list_mut().fetch().await;
        }
        Ok(())
    }

    fn row_id(&self, shell: &AppShell, n: usize) -> Option<uuid::Uuid> {
        let id = shell.list().visible_at(n).map(|r| r.resource.id);
        if id.is_none() {
            self.toaster.error(format!("No resource at position {n}"));
        }
        id
    }

    fn launch(&mut self, link: &str) -> Result<()> {
        writeln!(self.out, "{link}")?;
        if self.launch_links {
            if let Err(e) = open::that(link) {
                warn!("unable to open {link}: {e}");
                self.toaster.error(format!("Unable to open link: {e}"));
            }
        }
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    fn redraw(&mut self, shell: &AppShell) -> Result<()> {
        for toast in self.toaster.drain() {
            let marker = match toast.level {
                Level::Success => "✔",
                Level::Error => "✖",
            };
            writeln!(self.out, "{marker} {}", toast.message)?;
        }
        writeln!(self.out, "{}", shell.render())?;
        Ok(())
    }
}
