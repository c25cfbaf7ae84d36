//! Administrative commands for the recipe service.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sea_orm::Database;

use recipe_core::tracing::init_tracing;

use recipe_service::error::RecipeServiceError;
use recipe_service::infra::db::DbUserRepository;
use recipe_service::usecase::user::{CreateSuperuserUseCase, CreateUserInput, CreateUserUseCase};

#[derive(Parser, Debug)]
#[command(name = "manage", about = "Recipe service administration")]
struct Cli {
    /// Database connection string. Falls back to `DATABASE_URL`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an active staff account with every permission.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a regular account.
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url)
        .await
        .context("failed to connect to database")?;
    let repo = DbUserRepository { db };

    let result = match cli.command {
        Command::CreateSuperuser { email, password } => {
            CreateSuperuserUseCase { repo }
                .execute(&email, &password)
                .await
        }
        Command::CreateUser {
            email,
            password,
            name,
        } => {
            CreateUserUseCase { repo }
                .execute(CreateUserInput {
                    email,
                    password,
                    name,
                })
                .await
        }
    };

    match result {
        Ok(user) => {
            println!("created user {} (id {})", user.email, user.id);
            Ok(())
        }
        Err(RecipeServiceError::Validation(errors)) => {
            let details = serde_json::to_string(&errors).unwrap_or_default();
            anyhow::bail!("invalid input: {details}")
        }
        Err(e) => Err(anyhow::Error::new(e)),
    }
}
