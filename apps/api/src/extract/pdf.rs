use lopdf::Document;
use tracing::warn;

/// Concatenates the text of every page in page order, then trims.
/// A page whose text cannot be extracted contributes nothing.
pub(super) fn extract(data: &[u8]) -> Result<String, lopdf::Error> {
    let doc = Document::load_mem(data)?;

    // get_pages is keyed by page number, so iteration is already in document order
    let pages = doc
        .get_pages()
        .into_keys()
        .map(|page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!("No text extracted from PDF page {page_number}: {e}");
                String::new()
            }
        });

    Ok(join_pages(pages))
}

/// lopdf terminates every text object with a line break; those trailing
/// breaks belong to the reader, not to the page.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.trim_end_matches(['\r', '\n']));
    }
    text.trim().to_string()
}
