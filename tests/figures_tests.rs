use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use thesis_forge::core::figures::{apply_mapping_file, write_mapping_report, FigureKind};
use thesis_forge::ForgeError;

const CONVERTED: &str = r"\chapter{Methods}
The catchment is shown below.
\begin{figure}
\centering
\includegraphics[width=5in,height=3in]{source/figures/thesis/media/image1.png}
\caption{Catchment map \textbar{} 1:50000 \emph{scale}}
\end{figure}
Results follow.

\includegraphics{source/figures/thesis/media/image2.png}

Another reference to source/figures/thesis/media/image1.png in text.
";

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("thesis_full.tex"), CONVERTED).unwrap();

    let figures = dir.path().join("figures");
    fs::create_dir_all(figures.join("chapter2")).unwrap();
    fs::create_dir_all(figures.join("thesis").join("media")).unwrap();
    fs::write(figures.join("fig_2_1.pdf"), b"%PDF").unwrap();
    fs::write(figures.join("chapter2").join("fig_2_2.PNG"), b"png").unwrap();
    fs::write(figures.join("notes.md"), b"not a figure").unwrap();
    fs::write(figures.join("thesis").join("media").join("image1.png"), b"png").unwrap();
    dir
}

fn template_lines(report: &str) -> Vec<String> {
    report
        .lines()
        .filter(|line| line.ends_with('|') && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[test]
fn report_lists_figures_and_template() {
    let dir = workspace();
    let output = dir.path().join("figure_mapping_report.txt");
    let report = write_mapping_report(
        &dir.path().join("thesis_full.tex"),
        &dir.path().join("figures"),
        &output,
    )
    .unwrap();

    assert_eq!(report.figures.len(), 2);
    assert_eq!(report.figures[0].kind, FigureKind::FigureBlock);
    assert_eq!(report.figures[0].caption, "Catchment map | 1:50000 scale");
    assert_eq!(report.figures[1].kind, FigureKind::Standalone);
    assert!(report.figures[1].caption.starts_with("[no caption - context: "));

    // converter media folders are not user figures
    assert_eq!(report.user_figures, vec!["fig_2_1.pdf", "fig_2_2.PNG"]);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with(&"=".repeat(80)));
    assert!(text.contains("FIGURE MAPPING REPORT"));
    assert!(text.contains("Generated: "));
    assert_eq!(
        template_lines(&text),
        vec![
            "source/figures/thesis/media/image1.png|",
            "source/figures/thesis/media/image2.png|",
        ]
    );
}

#[test]
fn unedited_template_is_rejected() {
    let dir = workspace();
    let report = dir.path().join("report.txt");
    let tex = dir.path().join("thesis_full.tex");
    write_mapping_report(&tex, &dir.path().join("figures"), &report).unwrap();

    let output = dir.path().join("mapped.tex");
    let err = apply_mapping_file(&tex, &report, &output, Path::new("source/figures")).unwrap_err();
    assert!(matches!(err, ForgeError::EmptyMapping { .. }));
    assert!(!output.exists());
}

#[test]
fn edited_template_rewrites_paths() {
    let dir = workspace();
    let tex = dir.path().join("thesis_full.tex");
    let mapping = dir.path().join("mapping.txt");
    fs::write(
        &mapping,
        "# Format: source_path|user_path\n\
         source/figures/thesis/media/image1.png|fig_2_1.pdf\n\
         source/figures/thesis/media/image2.png|\n\
         source/figures/thesis/media/image9.png|fig_9.png\n",
    )
    .unwrap();

    let output = dir.path().join("mapped.tex");
    let outcome = apply_mapping_file(&tex, &mapping, &output, Path::new("source/figures")).unwrap();

    assert_eq!(outcome.replaced.len(), 1);
    assert_eq!(outcome.replaced[0].to, "source/figures/fig_2_1.pdf");
    assert_eq!(outcome.replaced[0].occurrences, 2);
    assert_eq!(outcome.missing, vec!["source/figures/thesis/media/image9.png"]);

    let mapped = fs::read_to_string(&output).unwrap();
    assert!(mapped.contains(r"\includegraphics[width=5in,height=3in]{source/figures/fig_2_1.pdf}"));
    assert!(mapped.contains("Another reference to source/figures/fig_2_1.pdf in text."));
    assert!(mapped.contains(r"\includegraphics{source/figures/thesis/media/image2.png}"));

    // the input is left untouched
    assert_eq!(fs::read_to_string(&tex).unwrap(), CONVERTED);
}

#[test]
fn missing_mapping_file() {
    let dir = workspace();
    let err = apply_mapping_file(
        &dir.path().join("thesis_full.tex"),
        &dir.path().join("absent.txt"),
        &dir.path().join("out.tex"),
        Path::new("source/figures"),
    )
    .unwrap_err();
    assert!(matches!(err, ForgeError::MissingInput { .. }));
}
