use super::CliError;
use crate::search::{ClusterInfo, SearchBackend};
use std::io::Write;

pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints client details followed by the full server description.
pub async fn info<B, W>(backend: &B, out: &mut W) -> Result<(), CliError>
where
    B: SearchBackend + ?Sized,
    W: Write,
{
    write_client(out)?;
    let info = backend.cluster_info().await?;
    write_server(out, &info)?;
    Ok(())
}

/// Prints the client version and the server version number only.
pub async fn version<B, W>(backend: &B, out: &mut W) -> Result<(), CliError>
where
    B: SearchBackend + ?Sized,
    W: Write,
{
    write_client(out)?;
    let info = backend.cluster_info().await?;
    writeln!(out)?;
    writeln!(out, "Server:")?;
    writeln!(out, " Version:\t{}", info.version.number)?;
    Ok(())
}

fn write_client<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Client:")?;
    writeln!(out, " Version:\t{}", CLIENT_VERSION)
}

fn write_server<W: Write>(out: &mut W, info: &ClusterInfo) -> std::io::Result<()> {
    let version = &info.version;
    let build_date = version
        .build_date
        .map(|d| d.to_rfc3339())
        .unwrap_or_default();

    writeln!(out)?;
    writeln!(out, "Server:")?;
    writeln!(out, " Name:\t{}", info.name)?;
    writeln!(out, " Cluster Name:\t{}", info.cluster_name)?;
    writeln!(out, " Cluster UUID:\t{}", info.cluster_uuid)?;
    writeln!(out, " Version:")?;
    writeln!(out, "  Number:\t{}", version.number)?;
    writeln!(out, "  Build Flavor:\t{}", version.build_flavor)?;
    writeln!(out, "  Build Type:\t{}", version.build_type)?;
    writeln!(out, "  Build Hash:\t{}", version.build_hash)?;
    writeln!(out, "  Build Date:\t{}", build_date)?;
    writeln!(out, "  Build Snapshot:\t{}", version.build_snapshot)?;
    writeln!(out, "  Lucene Version:\t{}", version.lucene_version)?;
    writeln!(
        out,
        "  Minimum Wire Compatibility Version:\t{}",
        version.minimum_wire_compatibility_version
    )?;
    writeln!(
        out,
        "  Minimum Index Compatibility Version:\t{}",
        version.minimum_index_compatibility_version
    )?;
    writeln!(out, " Tagline:\t{}", info.tagline)
}
