mod common;

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use common::{ScriptedGenerator, ScriptedLookup, test_config};
use wordbook::cancel::CancellationFlag;
use wordbook::error::Result;
use wordbook::extraction::{self, ExtractionMode, Extractor};
use wordbook::generator::CandidateGenerator;
use wordbook::pipeline::Pipeline;

const UNIT: &str = r#"# Unit 3 Vocabulary

<table>
<tr><td>NO.</td><td>单词</td><td>释义</td></tr>
<tr><td>1</td><td>recieve</td><td>v. 收到</td></tr>
<tr><td>2</td><td>bridge</td><td>n. 桥</td></tr>
<tr><td>3</td><td>look forward to</td><td>期待</td></tr>
<tr><td>4</td><td>Bridge</td><td>n. 桥梁</td></tr>
</table>

<table>
<tr><td>补充区</td><td>短语</td><td></td></tr>
<tr><td>5</td><td>take-off</td><td>起飞</td></tr>
<tr><td>6</td><td>harbour</td><td>n. 港口</td></tr>
</table>
"#;

#[test]
fn extract_words_only_writes_a_word_list() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("unit3.md");
    fs::write(&input, UNIT)?;

    let extraction = Extractor::for_mode(true, ExtractionMode::WordsOnly)?.extract_file(&input)?;
    let output = extraction::default_output_path(&input, ExtractionMode::WordsOnly);
    fs::write(&output, extraction::render(&extraction, ExtractionMode::WordsOnly))?;

    assert_eq!(output, dir.path().join("unit3_words.txt"));
    assert_eq!(fs::read_to_string(&output)?, "recieve\nbridge\nharbour\n");
    assert!(extraction.phrases.is_empty());
    Ok(())
}

#[test]
fn extract_full_lists_words_and_phrases_with_meanings() -> Result<()> {
    let extraction = Extractor::for_mode(true, ExtractionMode::Full)?.extract(UNIT);
    let text = extraction::render(&extraction, ExtractionMode::Full);

    assert!(text.contains("1. recieve\tv. 收到\n"));
    assert!(text.contains("6. harbour\tn. 港口\n"));
    assert!(text.contains("3. look forward to\t期待\n"));
    assert!(text.contains("5. take-off\t起飞\n"));
    let words_at = text.find("Words").unwrap();
    let phrases_at = text.find("Phrases").unwrap();
    assert!(words_at < phrases_at);
    Ok(())
}

#[test]
fn entity_encoded_cells_extract_as_plain_words() -> Result<()> {
    let document = "<table>\
        <tr><td>1</td><td>caf&eacute;</td><td>n. 咖啡馆</td></tr>\
        <tr><td>2</td><td>na&#239;ve</td><td>adj. 天真的</td></tr>\
        </table>";

    let extraction = Extractor::new(true, false)?.extract(document);

    assert_eq!(extraction.word_list(), vec!["café", "naïve"]);
    assert_eq!(extraction.words[1].meaning, "adj. 天真的");
    Ok(())
}

#[tokio::test]
async fn extracted_list_feeds_the_pipeline() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("unit3_words.txt");
    let extraction = Extractor::for_mode(true, ExtractionMode::WordsOnly)?.extract(UNIT);
    fs::write(&list, extraction::render(&extraction, ExtractionMode::WordsOnly))?;

    let lookup = Arc::new(ScriptedLookup::new(&["receive", "bridge", "harbour"]));
    let generator: Arc<dyn CandidateGenerator> =
        Arc::new(ScriptedGenerator::new().correction("recieve", "receive"));
    let pipeline = Pipeline::new(test_config(), lookup, Some(generator))?;

    let report = pipeline.run_file(&list, &CancellationFlag::new()).await?;

    assert_eq!(report.counts.corrected_first_pass, 1);
    assert_eq!(report.counts.confirmed, 2);
    assert_eq!(fs::read_to_string(&list)?, "receive\nbridge\nharbour\n");
    Ok(())
}
