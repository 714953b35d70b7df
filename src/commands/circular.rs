use super::{cluster, load_distances, typing_inputs, write_order};
use crate::cli::CircularArgs;
use crate::plots::{circular_tree, write_figure, CircularParams, ClassTrack, PointStyle};
use crate::utils::{open_text_reader, read_lines, split_fields, InputSource, Result, TextReader};
use std::{collections::HashMap, io::BufRead};

/// Rows of at least `min_fields` fields, keyed by their first field
fn read_keyed_rows<R: BufRead>(reader: R, min_fields: usize) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    for line in read_lines(reader) {
        let (line_number, line) = line?;
        let fields = split_fields(&line);
        if fields.len() < min_fields {
            return Err(format!(
                "Line {}: expected at least {} fields, found {}",
                line_number,
                min_fields,
                fields.len()
            ));
        }
        rows.push((line_number, fields.iter().map(|f| f.to_string()).collect()));
    }
    Ok(rows)
}

/// `label color` rows
fn read_label_colors<R: BufRead>(reader: R) -> Result<HashMap<String, String>> {
    Ok(read_keyed_rows(reader, 2)?
        .into_iter()
        .map(|(_, fields)| (fields[0].clone(), fields[1].clone()))
        .collect())
}

/// `label color category` rows in table order; the category names the legend entry
fn read_point_styles<R: BufRead>(reader: R) -> Result<Vec<(String, PointStyle)>> {
    Ok(read_keyed_rows(reader, 3)?
        .into_iter()
        .map(|(_, fields)| {
            let style = PointStyle {
                color: fields[1].clone(),
                category: fields[2..].join(" "),
            };
            (fields[0].clone(), style)
        })
        .collect())
}

/// A header naming the sample column and one ring per further column, then one row per sample.
/// Empty cells leave the sample unclassified on that ring.
fn read_class_table<R: BufRead>(reader: R) -> Result<Vec<ClassTrack>> {
    let mut rows = read_keyed_rows(reader, 2)?.into_iter();
    let (_, header) = rows
        .next()
        .ok_or_else(|| "Class table is empty".to_string())?;
    let mut tracks: Vec<ClassTrack> = header[1..]
        .iter()
        .map(|name| ClassTrack {
            name: name.clone(),
            classes: HashMap::new(),
        })
        .collect();
    for (line_number, fields) in rows {
        if fields.len() > header.len() {
            return Err(format!(
                "Line {}: {} fields but the header names {} columns",
                line_number,
                fields.len(),
                header.len()
            ));
        }
        for (track, class) in tracks.iter_mut().zip(&fields[1..]) {
            if !class.is_empty() {
                track.classes.insert(fields[0].clone(), class.clone());
            }
        }
    }
    Ok(tracks)
}

fn load_table<T>(
    src: &InputSource,
    what: &str,
    read: impl FnOnce(TextReader) -> Result<T>,
) -> Result<T> {
    let reader = open_text_reader(src)?;
    read(reader).map_err(|e| src.format_error(&format!("Failed to read {}", what), e))
}

pub fn circular(args: CircularArgs) -> Result<()> {
    let matrix = load_distances(&args.input)?;
    let dendro = cluster(&args.input, &matrix)?;

    let label_colors = args
        .label_colors_src
        .as_ref()
        .map(|src| load_table(src, "label colours", read_label_colors))
        .transpose()?;
    let point_colors = args
        .point_colors_src
        .as_ref()
        .map(|src| load_table(src, "point colours", read_point_styles))
        .transpose()?;
    let sample_classes = match &args.classes_src {
        Some(src) => load_table(src, "sample classes", read_class_table)?,
        None => Vec::new(),
    };
    log::debug!("Drawing {} class ring(s)", sample_classes.len());

    let params = CircularParams {
        width: args.size,
        height: args.size,
        fontsize: args.fontsize,
        open_angle: args.open_angle,
        start_angle: args.start_angle,
        add_labels: !args.no_labels,
        label_colors,
        add_points: args.add_points,
        point_size: args.point_size,
        point_colors,
        point_legend_title: args.point_legend_title.clone(),
        branch_color: args.branch_color,
        palette: args.palette.clone(),
        sample_classes,
        ..CircularParams::default()
    };
    let figure = circular_tree(&dendro, &params)?;
    write_order(args.order_out.as_deref(), &dendro.labels)?;

    let mut inputs = typing_inputs(&args.input);
    if let Some(src) = &args.classes_src {
        inputs.push(("Sample classes".to_string(), src.to_string()));
    }
    write_figure(
        &figure,
        &args.output_path,
        "Circular dendrogram",
        &inputs,
        Some(&dendro.labels),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::{dendrogram, linkage, DistanceMatrix, Linkage};

    #[test]
    fn label_colours_by_first_column() {
        let colors = read_label_colors("s1\tred\ns2 #00ff00\n".as_bytes()).unwrap();
        assert_eq!(colors["s1"], "red");
        assert_eq!(colors["s2"], "#00ff00");
        assert!(read_label_colors("s1\n".as_bytes()).is_err());
    }

    #[test]
    fn point_styles_keep_categories_in_table_order() {
        let table = "s9\tblue\tST 10\ns1\tred\tST131\ns2\tgreen\tST 10\n";
        let styles = read_point_styles(table.as_bytes()).unwrap();
        let labels = styles.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["s9", "s1", "s2"]);
        assert_eq!(
            styles[1].1,
            PointStyle {
                color: "red".to_string(),
                category: "ST131".to_string()
            }
        );
        assert_eq!(styles[0].1.category, "ST 10");
        assert!(read_point_styles("s1\tred\n".as_bytes()).is_err());
    }

    #[test]
    fn class_table_has_one_ring_per_column() {
        let table = "sample\tcountry\thost\ns1\tDE\tcattle\ns2\t\tpig\n";
        let tracks = read_class_table(table.as_bytes()).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "country");
        assert_eq!(tracks[0].classes.get("s1").map(String::as_str), Some("DE"));
        assert!(!tracks[0].classes.contains_key("s2"));
        assert_eq!(tracks[1].classes["s2"], "pig");

        assert!(read_class_table("".as_bytes()).is_err());
    }

    #[test]
    fn header_only_class_table_has_empty_rings() {
        let tracks = read_class_table("sample\tcountry\thost\n".as_bytes()).unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.classes.is_empty()));
    }

    #[test]
    fn class_row_longer_than_header_is_an_error() {
        let err = read_class_table("sample\tcountry\ns1\tDE\textra\n".as_bytes()).unwrap_err();
        assert_eq!(err, "Line 2: 3 fields but the header names 2 columns");
    }

    #[test]
    fn empty_class_cells_leave_samples_unclassified() {
        let table = "sample\tcountry\thost\ns1\t\tcattle\ns2\tFR\t\n";
        let tracks = read_class_table(table.as_bytes()).unwrap();
        assert!(!tracks[0].classes.contains_key("s1"));
        assert_eq!(tracks[0].classes["s2"], "FR");
        assert_eq!(tracks[1].classes["s1"], "cattle");
        assert!(!tracks[1].classes.contains_key("s2"));
    }

    #[test]
    fn point_table_order_drives_the_legend() {
        let table = "s5\tblue\tST2\ns4\tblue\tST2\ns1\tred\tST1\ns2\tred\tST1\ns3\tred\tST1\n";
        let point_colors = read_point_styles(table.as_bytes()).unwrap();
        let labels = ["s1", "s2", "s3", "s4", "s5"].map(String::from).to_vec();
        let values = vec![
            0.0, 1.0, 4.0, 8.0, 9.0, //
            1.0, 0.0, 4.0, 8.0, 9.0, //
            4.0, 4.0, 0.0, 8.0, 9.0, //
            8.0, 8.0, 8.0, 0.0, 2.0, //
            9.0, 9.0, 9.0, 2.0, 0.0,
        ];
        let matrix = DistanceMatrix::new(labels, values).unwrap();
        let merges = linkage(&matrix, Linkage::Average).unwrap();
        let dendro = dendrogram(&merges, &matrix.labels, None).unwrap();
        let params = CircularParams {
            add_points: true,
            point_colors: Some(point_colors),
            ..CircularParams::default()
        };
        let figure = circular_tree(&dendro, &params).unwrap();
        let legend = figure.legends[0]
            .entries
            .iter()
            .map(|e| (e.label.as_str(), e.color.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(legend, vec![("ST2", "#0000ff"), ("ST1", "#ff0000")]);
    }
}
