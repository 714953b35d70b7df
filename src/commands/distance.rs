use crate::cli::DistanceArgs;
use crate::typing::{allele_differences, read_profiles};
use crate::utils::{create_output_writer, open_text_reader, Result};
use std::io::Write;

pub fn distance(args: DistanceArgs) -> Result<()> {
    let reader = open_text_reader(&args.profiles_src)?;
    let profiles = read_profiles(reader, &args.missing)
        .map_err(|e| args.profiles_src.format_error("Failed to read allele profiles", e))?;
    log::info!(
        "Loaded {} samples typed at {} loci",
        profiles.num_samples(),
        profiles.num_loci()
    );
    for (sample, called) in profiles.samples.iter().zip(profiles.called_loci()) {
        log::debug!("{}: {} of {} loci called", sample, called, profiles.num_loci());
    }

    let matrix = allele_differences(&profiles, args.threads)?;
    let mut writer = create_output_writer(args.output.as_deref())?;
    matrix.write_tsv(&mut writer)?;
    writer
        .flush()
        .map_err(|e| format!("Failed to write distance matrix: {}", e))
}
