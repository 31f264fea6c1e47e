use crate::application::services::ProfileStore;
use crate::domain::auth::AuthStrategy;
use crate::domain::entities::Profile;
use crate::domain::errors::CallError;
use crate::presentation::cli::parse_header;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

/// Profile management: add / list / show / remove
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Create or replace a profile
    Add(AddProfile),
    /// List saved profiles
    List,
    /// Show one profile in detail
    Show {
        #[arg(long)]
        name: String,
    },
    /// Delete a profile
    Remove {
        #[arg(long)]
        name: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AddProfile {
    /// Profile name
    #[arg(long)]
    pub name: String,

    /// Base URL, e.g. https://api.example.com
    #[arg(long = "base-url", default_value = "")]
    pub base_url: String,

    /// Auth type: none|basic|bearer
    #[arg(long = "auth", default_value = "none")]
    pub auth_type: String,

    #[arg(long, default_value = "")]
    pub user: String,

    #[arg(long, default_value = "")]
    pub pass: String,

    #[arg(long, default_value = "")]
    pub token: String,

    /// Default header 'Key: Value' (can be repeated)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

impl ProfileCommand {
    pub fn run<W: Write>(&self, store: &dyn ProfileStore, out: &mut W) -> Result<()> {
        match self {
            ProfileCommand::Add(add) => add.run(store, out),
            ProfileCommand::List => list(store, out),
            ProfileCommand::Show { name } => show(store, name, out),
            ProfileCommand::Remove { name } => remove(store, name, out),
        }
    }
}

impl AddProfile {
    fn run<W: Write>(&self, store: &dyn ProfileStore, out: &mut W) -> Result<()> {
        let auth_type = self.auth_type.to_lowercase();
        AuthStrategy::select(&auth_type, &self.user, &self.pass, &self.token)?;

        let mut profiles = store.load()?;
        profiles.upsert(Profile {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            headers: self.headers.iter().cloned().collect(),
            auth_type,
            user: self.user.clone(),
            pass: self.pass.clone(),
            token: self.token.clone(),
        });
        store.save(&profiles)?;

        writeln!(out, "Profile {:?} saved", self.name)?;
        Ok(())
    }
}

fn list<W: Write>(store: &dyn ProfileStore, out: &mut W) -> Result<()> {
    let profiles = store.load()?;
    if profiles.profiles.is_empty() {
        writeln!(out, "No profiles defined.")?;
        return Ok(());
    }

    writeln!(out, "Profiles:")?;
    for (name, profile) in &profiles.profiles {
        writeln!(
            out,
            "- {} (base-url: {}, auth: {})",
            name,
            profile.base_url,
            profile.auth_label()
        )?;
    }
    Ok(())
}

fn show<W: Write>(store: &dyn ProfileStore, name: &str, out: &mut W) -> Result<()> {
    let profiles = store.load()?;
    let profile = profiles
        .get(name)
        .ok_or_else(|| CallError::ProfileNotFound(name.to_string()))?;

    writeln!(out, "Profile {name:?}")?;
    writeln!(out, "  Base URL : {}", profile.base_url)?;
    writeln!(out, "  Auth     : {}", profile.auth_label())?;
    if !profile.user.is_empty() {
        writeln!(out, "  User     : {}", profile.user)?;
    }
    if !profile.token.is_empty() {
        writeln!(out, "  Token    : (set)")?;
    }
    if !profile.headers.is_empty() {
        writeln!(out, "  Headers  :")?;
        for (key, value) in profile.headers.iter() {
            writeln!(out, "    {key}: {value}")?;
        }
    }
    Ok(())
}

fn remove<W: Write>(store: &dyn ProfileStore, name: &str, out: &mut W) -> Result<()> {
    let mut profiles = store.load()?;
    if profiles.remove(name).is_none() {
        return Err(CallError::ProfileNotFound(name.to_string()).into());
    }
    store.save(&profiles)?;

    writeln!(out, "Profile {name:?} removed")?;
    Ok(())
}
