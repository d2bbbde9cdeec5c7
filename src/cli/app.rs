use std::{env, path::PathBuf, sync::Arc};

use condo_config::{Config, ConfigManager};
use condo_domain::EntityId;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::backend::SecondaryAsset;
use crate::cli::driver::{run_wizard, WizardRun};
use crate::cli::notifier::ConsoleNotifier;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::prompts::DialoguerInteraction;
use crate::errors::{CliError, WizardError};
use crate::forms::{
    BlockForm, CondominiumForm, ContactForm, EntityKind, InvoiceForm, OrganizationForm,
    ResidentForm, UnitForm, VehicleForm,
};
use crate::http::RestBackend;
use crate::utils::build_info;
use crate::wizard::{EntityForm, SessionContext, Wizard, WizardController};

pub const TOKEN_ENV: &str = "CONDO_WIZARD_TOKEN";
pub const HOME_ENV: &str = "CONDO_WIZARD_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Run(RunArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub entity: EntityKind,
    pub edit: Option<EntityId>,
    pub asset: Option<PathBuf>,
}

pub fn usage() -> String {
    let entities: Vec<&str> = EntityKind::ALL.iter().map(|kind| kind.name()).collect();
    format!(
        "Usage: condo_wizard_cli <entity> [--edit <id>] [--asset <path>]\n\
         Entities: {}\n\
         Options:\n  \
         --edit <id>     load an existing record and update it\n  \
         --asset <path>  file uploaded after saving (condominium image, resident photo, organization logo)\n  \
         --version       print build information\n  \
         --help          print this message\n\
         Environment:\n  \
         {}  API base URL\n  \
         {}  bearer token\n  \
         {}  directory holding config/config.json",
        entities.join(", "),
        condo_config::model::API_URL_ENV,
        TOKEN_ENV,
        HOME_ENV
    )
}

pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut entity = None;
    let mut edit = None;
    let mut asset = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--edit" => {
                let id = iter
                    .next()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| CliError::Usage("--edit requires an id".into()))?;
                edit = Some(EntityId::new(id.trim()));
            }
            "--asset" => {
                let path = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--asset requires a path".into()))?;
                asset = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option `{}`", flag)));
            }
            name if entity.is_none() => {
                let kind = name
                    .parse::<EntityKind>()
                    .map_err(|err| CliError::Usage(err.to_string()))?;
                entity = Some(kind);
            }
            extra => {
                return Err(CliError::Usage(format!("Unexpected argument `{}`", extra)));
            }
        }
    }

    let entity = entity.ok_or_else(|| CliError::Usage("Missing entity name".into()))?;
    Ok(Command::Run(RunArgs {
        entity,
        edit,
        asset,
    }))
}

/// Entry point of the `condo_wizard_cli` binary.
pub fn run_cli(args: Vec<String>) -> Result<(), CliError> {
    match parse_args(&args)? {
        Command::Help => {
            println!("{}", usage());
            Ok(())
        }
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        Command::Run(run) => {
            let config = load_config()?;
            output::set_preferences(OutputPreferences {
                color: config.ui_color_enabled,
                quiet: false,
            });
            let mut session = SessionContext::from_config(&config);
            if let Ok(token) = env::var(TOKEN_ENV) {
                if !token.trim().is_empty() {
                    session = session.with_token(token.trim());
                }
            }
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(open_entity(run, config, session))
        }
    }
}

fn load_config() -> Result<Config, CliError> {
    let base = env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(ConfigManager::default_base_dir);
    let manager = ConfigManager::with_base_dir(base)?;
    let config = manager.load()?.with_env_overrides();
    config.validate()?;
    info!(path = %manager.config_path().display(), api = %config.api_base_url, "configuration loaded");
    Ok(config)
}

struct RunContext {
    args: RunArgs,
    config: Config,
    session: SessionContext,
    backend: Arc<RestBackend>,
}

async fn open_entity(args: RunArgs, config: Config, session: SessionContext) -> Result<(), CliError> {
    let backend = Arc::new(RestBackend::from_config(&config, session.clone())?);
    let ctx = RunContext {
        args,
        config,
        session,
        backend,
    };
    match ctx.args.entity {
        EntityKind::Condominium => {
            open(&ctx, CondominiumForm::new_create, CondominiumForm::new_edit).await
        }
        EntityKind::Block => open(&ctx, BlockForm::new_create, BlockForm::new_edit).await,
        EntityKind::Unit => open(&ctx, UnitForm::new_create, UnitForm::new_edit).await,
        EntityKind::Resident => open(&ctx, ResidentForm::new_create, ResidentForm::new_edit).await,
        EntityKind::Organization => {
            open(&ctx, OrganizationForm::new_create, OrganizationForm::new_edit).await
        }
        EntityKind::Contact => open(&ctx, ContactForm::new_create, ContactForm::new_edit).await,
        EntityKind::Vehicle => open(&ctx, VehicleForm::new_create, VehicleForm::new_edit).await,
        EntityKind::Invoice => open(&ctx, InvoiceForm::new_create, InvoiceForm::new_edit).await,
    }
}

async fn open<F, P>(
    ctx: &RunContext,
    create: fn() -> F,
    edit: fn(EntityId, &P) -> F,
) -> Result<(), CliError>
where
    F: EntityForm,
    P: DeserializeOwned,
{
    let kind = ctx.args.entity;
    let form = match &ctx.args.edit {
        Some(id) => {
            let record = ctx.backend.fetch(kind.resource(), id).await?;
            let existing: P = serde_json::from_value(record).map_err(WizardError::from)?;
            edit(id.clone(), &existing)
        }
        None => create(),
    };

    let mut wizard = Wizard::new(form, ctx.session.clone()).map_err(WizardError::from)?;
    if let Some(path) = &ctx.args.asset {
        let slot = wizard
            .form()
            .asset_slot()
            .ok_or(WizardError::AssetUnsupported(kind.name()))?;
        wizard.attach_asset(SecondaryAsset::from_path(slot, path)?)?;
    }

    let backend = ctx.backend.clone();
    let controller = WizardController::new(wizard, backend, Arc::new(ConsoleNotifier))
        .with_config(&ctx.config)
        .on_saved(move |id| info!(entity = kind.name(), id = %id, "record stored"));

    let mut interaction = DialoguerInteraction::new();
    match run_wizard(&controller, &mut interaction).await? {
        WizardRun::Saved(id) => output::info(format!("{} id: {}", kind.name(), id)),
        WizardRun::Cancelled => output::info("Wizard cancelled."),
    }
    Ok(())
}
