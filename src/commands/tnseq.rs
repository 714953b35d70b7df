use crate::cli::TnseqArgs;
use crate::genome::{load_cds, read_insertions, Cds, Insertion};
use crate::plots::{tnseq_plot, write_figure, TnseqParams};
use crate::utils::{open_text_reader, GenomicRegion, Result};

/// Window covering everything loaded, from `start` to the last CDS end or insertion
fn infer_length(start: u64, cds: &[Cds], insertions: &[Insertion]) -> Result<u64> {
    let last = cds
        .iter()
        .map(|c| c.end)
        .chain(insertions.iter().map(|i| i.pos))
        .max()
        .unwrap_or(0);
    if last <= start {
        return Err(format!(
            "Nothing to plot after position {}; set the window with --length or --region",
            start
        ));
    }
    Ok(last - start + 1)
}

pub fn tnseq(args: TnseqArgs) -> Result<()> {
    let contig = args
        .contig
        .as_deref()
        .or(args.region.as_ref().map(|r| r.contig.as_str()));
    let reader = open_text_reader(&args.insertions_src)?;
    let insertions = read_insertions(reader, contig)
        .map_err(|e| args.insertions_src.format_error("Failed to read insertions", e))?;
    log::info!("Loaded {} insertion sites from {}", insertions.len(), args.insertions_src);
    let cds = load_cds(&args.cds_src, args.record.as_deref())?;

    let (track_start, track_length) = match &args.region {
        Some(region) => (region.start, region.len()),
        None => match args.length {
            Some(length) => (args.start, length),
            None => {
                let length = infer_length(args.start, &cds, &insertions)?;
                log::info!("Track length set to {} from the input data", length);
                (args.start, length)
            }
        },
    };

    let window = GenomicRegion::from_start_length(
        contig.unwrap_or("track"),
        track_start,
        track_length,
    )?;

    let params = TnseqParams {
        fig_width: args.fig_width,
        track_start,
        track_length: Some(track_length),
        track_height: args.track_height,
        track_label: args.track_label.clone(),
        track_labelsize: args.track_label_size,
        track_sublabelpos: args.sublabel_pos,
        track_sublabelsize: args.sublabel_size,
        cds_plotstyle: args.cds_style,
        cds_color: args.cds_color.clone(),
        cds_label: args.cds_labels,
        cds_labelsize: args.cds_label_size,
        cds_labvpos: args.cds_label_vpos,
        cds_labhpos: args.cds_label_hpos,
        cds_labrotation: args.cds_label_rotation,
        cds_arrowshaftratio: args.arrow_shaft_ratio,
        bax_bottompos: args.bar_bottom,
        bax_height: args.bar_panel_height,
        bax_ylabel: args.ylabel.clone(),
        bax_ylabelsize: args.ylabel_size,
        bax_xticklabelsize: args.xtick_size,
        bax_yticklabelsize: args.ytick_size,
        bar_width: args.bar_width,
        bar_color: args.bar_color.clone(),
        bar_alpha: args.bar_alpha,
    };
    let figure = tnseq_plot(&insertions, Some(&cds), &params)?;

    let inputs = vec![
        ("Insertions".to_string(), args.insertions_src.to_string()),
        ("CDS".to_string(), args.cds_src.to_string()),
        (
            "Window".to_string(),
            format!("{}-{}", window.start, window.end),
        ),
    ];
    let title = args.track_label.as_deref().unwrap_or("Tn-seq insertions");
    write_figure(&figure, &args.output_path, title, &inputs, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::genome::Strand;
    use clap::Parser;

    fn cds(start: u64, end: u64) -> Cds {
        Cds {
            start,
            end,
            strand: Strand::Forward,
            name: "g".to_string(),
            color: None,
        }
    }

    #[test]
    fn length_reaches_the_last_feature() {
        let insertions = [Insertion { pos: 900, count: 3.0 }];
        assert_eq!(infer_length(1, &[cds(10, 500)], &insertions), Ok(900));
        assert_eq!(infer_length(101, &[cds(10, 1500)], &insertions), Ok(1400));
        assert!(infer_length(2000, &[cds(10, 1500)], &insertions).is_err());
        assert!(infer_length(1, &[], &[]).is_err());
    }

    #[test]
    fn oversized_window_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("table.txt");
        std::fs::write(&table, "100\t200\t+\tdnaA\n").unwrap();
        let counts = dir.path().join("counts.txt");
        std::fs::write(&counts, "150\t3\n").unwrap();
        let output = dir.path().join("out.svg");
        let cli = Cli::try_parse_from([
            "cvmplot",
            "tnseq",
            "-i",
            counts.to_str().unwrap(),
            "-c",
            table.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--start",
            "18446744073709551000",
            "--length",
            "1000",
        ])
        .unwrap();
        let Command::Tnseq(args) = cli.command else {
            panic!("expected tnseq");
        };
        let err = tnseq(args).unwrap_err();
        assert!(err.ends_with("run past the largest position"));
        assert!(!output.exists());
    }
}
