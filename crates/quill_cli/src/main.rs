//! Command-line front end for the quill blog store.
//!
//! # Responsibility
//! - Map subcommands onto `AuthorService`/`PostService` calls.
//! - Print rejected field values as plain messages with a non-zero exit.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quill_core::db::open_db;
use quill_core::{
    core_version, init_logging, Author, AuthorId, AuthorService, Category, NewPost, Post, PostId,
    PostPatch, PostService, QuillConfig, SqliteAuthorRepository, SqlitePostRepository,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Manage blog authors and posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Author records
    #[command(subcommand)]
    Author(AuthorCommand),

    /// Post records
    #[command(subcommand)]
    Post(PostCommand),

    /// Print the core version
    Version,
}

#[derive(Subcommand)]
enum AuthorCommand {
    /// Create an author
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// List every author
    List,
    /// Show one author
    Show { id: AuthorId },
    /// Change an author's name
    Rename {
        id: AuthorId,
        #[arg(long)]
        name: String,
    },
    /// Change an author's phone number
    Phone {
        id: AuthorId,
        #[arg(long)]
        phone: String,
    },
    /// Delete an author
    Delete { id: AuthorId },
}

#[derive(Subcommand)]
enum PostCommand {
    /// Create a post
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long)]
        summary: Option<String>,
        /// Fiction or Non-Fiction
        #[arg(long)]
        category: Option<String>,
    },
    /// List posts
    List {
        /// Only list posts in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one post
    Show { id: PostId },
    /// Change fields of a post; omitted fields are kept
    Edit {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a post
    Delete { id: PostId },
}

#[derive(Args)]
struct ContentArgs {
    /// Post body
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the post body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
}

impl ContentArgs {
    fn resolve(self) -> Result<Option<String>> {
        match (self.content, self.content_file) {
            (Some(content), _) => Ok(Some(content)),
            (None, Some(path)) => std::fs::read_to_string(&path)
                .map(Some)
                .with_context(|| format!("failed to read content file `{}`", path.display())),
            (None, None) => Ok(None),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => QuillConfig::load_from(path)?,
        None => QuillConfig::load()?,
    };
    if let Some(log_dir) = config.logging.dir.as_deref() {
        init_logging(&config.logging.level, log_dir)?;
    }
    let db_path = cli.db.unwrap_or(config.database.path);

    match cli.command {
        Commands::Version => {
            println!("quill {}", core_version());
            Ok(())
        }
        Commands::Author(command) => run_author(&connect(&db_path)?, command),
        Commands::Post(command) => run_post(&connect(&db_path)?, command),
    }
}

fn connect(path: &Path) -> Result<Connection> {
    open_db(path).with_context(|| format!("failed to open database `{}`", path.display()))
}

fn run_author(conn: &Connection, command: AuthorCommand) -> Result<()> {
    let service = AuthorService::new(SqliteAuthorRepository::try_new(conn)?);

    match command {
        AuthorCommand::Add { name, phone } => {
            let author = service.create_author(name, phone)?;
            println!("created {author}");
        }
        AuthorCommand::List => {
            for author in service.list_authors()? {
                println!("{author}");
            }
        }
        AuthorCommand::Show { id } => match service.get_author(id)? {
            Some(author) => print_author(&author),
            None => anyhow::bail!("author not found: {id}"),
        },
        AuthorCommand::Rename { id, name } => {
            let author = service.rename_author(id, name)?;
            println!("updated {author}");
        }
        AuthorCommand::Phone { id, phone } => {
            let author = service.change_phone_number(id, phone)?;
            println!("updated {author}");
        }
        AuthorCommand::Delete { id } => {
            service.delete_author(id)?;
            println!("deleted author {id}");
        }
    }

    Ok(())
}

fn run_post(conn: &Connection, command: PostCommand) -> Result<()> {
    let service = PostService::new(SqlitePostRepository::try_new(conn)?);

    match command {
        PostCommand::Add {
            title,
            content,
            summary,
            category,
        } => {
            let post = service.create_post(NewPost {
                title,
                content: content.resolve()?,
                summary,
                category,
            })?;
            println!("created post {}", post.id().unwrap_or_default());
        }
        PostCommand::List { category } => {
            let category = category
                .as_deref()
                .map(str::parse::<Category>)
                .transpose()?;
            for post in service.list_posts(category)? {
                println!(
                    "{}\t{}\t{}",
                    post.id().unwrap_or_default(),
                    post.category().map_or("-", Category::as_str),
                    post.title()
                );
            }
        }
        PostCommand::Show { id } => match service.get_post(id)? {
            Some(post) => print_post(&post),
            None => anyhow::bail!("post not found: {id}"),
        },
        PostCommand::Edit {
            id,
            title,
            content,
            summary,
            category,
        } => {
            let patch = PostPatch {
                title,
                content: content.resolve()?,
                summary,
                category,
            };
            let post = service.update_post(id, patch)?;
            println!("updated post {}", post.id().unwrap_or_default());
        }
        PostCommand::Delete { id } => {
            service.delete_post(id)?;
            println!("deleted post {id}");
        }
    }

    Ok(())
}

fn print_author(author: &Author) {
    println!("id:           {}", author.id().unwrap_or_default());
    println!("name:         {}", author.name());
    println!("phone_number: {}", author.phone_number());
    println!("created_at:   {}", author.created_at().unwrap_or_default());
    println!("updated_at:   {}", author.updated_at().unwrap_or_default());
}

fn print_post(post: &Post) {
    println!("id:         {}", post.id().unwrap_or_default());
    println!("title:      {}", post.title());
    println!(
        "category:   {}",
        post.category().map_or("-", Category::as_str)
    );
    println!("summary:    {}", post.summary().unwrap_or("-"));
    println!("created_at: {}", post.created_at().unwrap_or_default());
    println!("updated_at: {}", post.updated_at().unwrap_or_default());
    if let Some(content) = post.content() {
        println!();
        println!("{content}");
    }
}
