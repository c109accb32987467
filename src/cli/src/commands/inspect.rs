//! `a3s-inspect inspect`, `container inspect` and `image inspect`.

use std::path::Path;

use clap::Args;
use tracing::debug;

use a3s_inspect_core::kind::KIND_ALL;
use a3s_inspect_core::{
    ArtifactDecoder, FieldTemplate, InspectConfig, InspectionRequest, Inspector, KindConstraint,
};
use a3s_inspect_runtime::LocalRuntime;

#[derive(Args)]
pub struct InspectArgs {
    /// Format the output using the given Go template, or "json"
    #[arg(short, long, default_value = "")]
    pub format: String,

    /// Return JSON for the specified type: container, image or all
    #[arg(short = 't', long = "type", default_value = KIND_ALL)]
    pub kind: String,

    /// Act on the latest container created (containers only)
    #[arg(short, long)]
    pub latest: bool,

    /// Display total file sizes (containers only)
    #[arg(short, long)]
    pub size: bool,

    /// Container or image names or IDs
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct ContainerInspectArgs {
    /// Format the output using the given Go template, or "json"
    #[arg(short, long, default_value = "")]
    pub format: String,

    /// Act on the latest container created
    #[arg(short, long)]
    pub latest: bool,

    /// Display total file sizes
    #[arg(short, long)]
    pub size: bool,

    /// Container names or IDs
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct ImageInspectArgs {
    /// Format the output using the given Go template, or "json"
    #[arg(short, long, default_value = "")]
    pub format: String,

    /// Image references or IDs
    pub names: Vec<String>,
}

pub async fn execute(
    root: Option<&Path>,
    args: InspectArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    InspectionRequest::check_targets(&args.names, args.latest)?;
    let kind: KindConstraint = args.kind.parse()?;
    let request = InspectionRequest::new(args.names, kind, args.size, args.latest)?;
    print!("{}", inspect(root, &request, &args.format).await?);
    Ok(())
}

pub async fn execute_container(
    root: Option<&Path>,
    args: ContainerInspectArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = InspectionRequest::new(
        args.names,
        KindConstraint::ContainerOnly,
        args.size,
        args.latest,
    )?;
    print!("{}", inspect(root, &request, &args.format).await?);
    Ok(())
}

pub async fn execute_image(
    root: Option<&Path>,
    args: ImageInspectArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = InspectionRequest::new(args.names, KindConstraint::ImageOnly, false, false)?;
    print!("{}", inspect(root, &request, &args.format).await?);
    Ok(())
}

/// Run a validated request against the local data root and return the
/// rendered output.
pub async fn inspect(
    root: Option<&Path>,
    request: &InspectionRequest,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = InspectConfig::load_or_default(root)?;
    debug!(root = %config.root_dir.display(), policy = ?config.batch_policy, "Loaded config");

    let runtime = LocalRuntime::open(&config.root_dir)?;
    let decoder = ArtifactDecoder::new(&runtime);
    let inspector = Inspector::new(&runtime, &runtime, &decoder, &FieldTemplate)
        .with_policy(config.batch_policy);

    Ok(inspector.run(request, format).await?)
}
