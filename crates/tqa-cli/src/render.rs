//! Rendering of answers and relevance digests

use colored::*;
use tqa_core::{Answer, Error, RelevanceDigestEntry};

/// Plain-text listing of the digest, one block per passage
pub fn format_digest(digest: &[RelevanceDigestEntry]) -> String {
    digest.iter().map(format_digest_entry).collect()
}

fn format_digest_entry(entry: &RelevanceDigestEntry) -> String {
    format!(
        "- Relatedness: {:.3}\n  Chunk: {}\n\n",
        entry.relatedness, entry.chunk
    )
}

/// Print the answer followed by the digest, flagging low-confidence sources
pub fn print_answer(answer: &Answer, refusal_phrase: &str) {
    println!();
    if answer.looks_like_refusal(refusal_phrase) {
        println!("{} {}", "🤷".yellow(), answer.text.yellow());
    } else {
        println!("{} {}", "→".green(), answer.text.bold());
    }
    println!();

    println!("{}", "Most relevant chunks:".bold());
    for entry in &answer.digest {
        let block = format_digest_entry(entry);
        let (header, rest) = block.split_once('\n').unwrap_or((block.as_str(), ""));
        if entry.is_relevant {
            println!("{}", header.green());
        } else {
            println!("{} {}", header.yellow(), "(low confidence)".dimmed());
        }
        print!("{rest}");
    }
}

/// Print the exact prompt sent to the model and the uncoloured digest listing
pub fn print_prompt(prompt: &str, digest: &[RelevanceDigestEntry]) {
    println!("{}", "Prompt sent to the model:".bold());
    println!("{}", prompt.dimmed());
    println!();
    print!("Most relevant chunks: {}", format_digest(digest));
}

/// Print a pipeline failure; never leaves the user with a silent empty answer
pub fn print_failure(error: &Error) {
    let hint = if error.is_retryable() {
        "The provider may be busy, try again shortly."
    } else {
        "Check the configuration and the embedding index."
    };
    eprintln!("{} Could not answer: {}", "❌".red(), error.to_string().red());
    eprintln!("   {}", hint.dimmed());
}
