//! `threadsmith preview`: Show how text would be split into a thread.

use threadsmith_core::{Segmenter, format_preview};

use super::{load_config, read_text_arg};

pub async fn run(text: String, max_length: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let text = read_text_arg(&text)?;
    let segmenter = Segmenter::new(max_length.unwrap_or(config.thread.max_unit_length));
    segmenter.validate()?;

    let chunks = segmenter.segment(&text)?;
    print!("{}", format_preview(&chunks));
    Ok(())
}
