use clap::Args;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use tindahan_app::database;

/// Role attributes that keep the runtime role subject to row-level security.
const RUNTIME_ROLE_FLAGS: &str =
    "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Role the JSON API connects as
    #[arg(long, default_value = "tindahan_app")]
    role_name: String,

    /// Password to set on the role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Identifiers and literals already quoted by the server.
struct Quoted {
    role: String,
    password: String,
    database: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role-name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    let quoted = quote(&mut tx, &args)
        .await
        .map_err(|error| format!("failed to quote identifiers: {error}"))?;

    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    for sql in role_statements(&quoted, role_exists) {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{}`: {error}", redact(&sql, &quoted)))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);
    println!("row-level security applies to every connection made as this role");

    Ok(())
}

async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    args: &EnsureAppRoleArgs,
) -> Result<Quoted, sqlx::Error> {
    let (role, password, database): (String, String, String) = query_as(
        "SELECT quote_ident($1), quote_literal($2), quote_ident(current_database())",
    )
    .bind(&args.role_name)
    .bind(&args.password)
    .fetch_one(&mut **tx)
    .await?;

    Ok(Quoted {
        role,
        password,
        database,
    })
}

/// Statements that create or update the role and grant it access to current and future
/// objects in `public`.
fn role_statements(quoted: &Quoted, role_exists: bool) -> Vec<String> {
    let Quoted {
        role,
        password,
        database,
    } = quoted;

    let verb = if role_exists { "ALTER" } else { "CREATE" };

    vec![
        format!("{verb} ROLE {role} {RUNTIME_ROLE_FLAGS} PASSWORD {password}"),
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        format!("GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT USAGE, SELECT, UPDATE ON SEQUENCES TO {role}"
        ),
    ]
}

/// Keep the password out of error output.
fn redact(sql: &str, quoted: &Quoted) -> String {
    sql.replace(&quoted.password, "'********'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted() -> Quoted {
        Quoted {
            role: "tindahan_app".to_string(),
            password: "'s3cret'".to_string(),
            database: "\"tindahan\"".to_string(),
        }
    }

    #[test]
    fn new_role_is_created_without_rls_bypass() {
        let statements = role_statements(&quoted(), false);

        assert!(statements[0].starts_with("CREATE ROLE tindahan_app "));
        assert!(statements[0].contains("NOBYPASSRLS"));
        assert!(statements[0].contains("NOSUPERUSER"));
        assert_eq!(
            statements[1],
            "GRANT CONNECT ON DATABASE \"tindahan\" TO tindahan_app"
        );
    }

    #[test]
    fn existing_role_is_altered() {
        let statements = role_statements(&quoted(), true);

        assert!(statements[0].starts_with("ALTER ROLE tindahan_app "));
        assert_eq!(statements.len(), 7);
    }

    #[test]
    fn redact_hides_password() {
        let quoted = quoted();
        let statements = role_statements(&quoted, false);

        let redacted = redact(&statements[0], &quoted);

        assert!(!redacted.contains("s3cret"));
        assert!(redacted.ends_with("PASSWORD '********'"));
    }
}
