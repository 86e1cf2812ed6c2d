//! Markdown rendering of a [`Digest`].

use crate::models::{ArticleReport, Digest, Sentiment, SourceLang, StageOutcome, Summary, Variant};
use crate::utils::upcase;
use std::fmt::Write;

/// Render the whole digest.
pub fn digest_to_markdown(digest: &Digest) -> String {
    let mut md = String::new();
    let _ = writeln!(
        md,
        "# News for {} ({} edition)\n",
        digest.local_date,
        upcase(&digest.time_of_day)
    );
    if digest.articles.is_empty() {
        md.push_str("_No articles were fetched._\n");
    }
    for article in &digest.articles {
        md.push_str(&article_to_markdown(article, digest.variant));
    }
    md
}

/// Render one article section.
pub fn article_to_markdown(article: &ArticleReport, variant: Variant) -> String {
    let mut md = String::new();
    let title = if article.title.is_empty() { "(untitled)" } else { article.title.as_str() };
    let _ = writeln!(md, "## {title}\n");
    let _ = writeln!(md, "{}\n", article.link);
    let _ = writeln!(md, "**Language Detected:** {}\n", article.language);

    if variant == Variant::Lite || !article.content.is_ok() {
        match &article.content {
            StageOutcome::Ok { value } if value.is_empty() => {
                md.push_str("**Content:** _(no paragraphs found)_\n\n");
            }
            StageOutcome::Ok { value } => {
                let _ = writeln!(md, "**Content:** {value}\n");
            }
            StageOutcome::Failed { reason } => {
                let _ = writeln!(md, "**Content:** {reason}\n");
            }
        }
    }

    if let Some(summary) = &article.summary {
        md.push_str(&summary_line(summary));
    }
    if let Some(sentiment) = &article.sentiment {
        md.push_str(&sentiment_line(sentiment));
    }
    md
}

fn summary_line(summary: &StageOutcome<Summary>) -> String {
    match summary {
        StageOutcome::Ok { value } => {
            let mut line = format!("**Summary:** {}\n\n", value.text);
            if let SourceLang::Fallback { requested, tag } = &value.source_lang {
                let _ = writeln!(
                    line,
                    "_(language `{requested}` is not supported by the summarizer; summarized as `{tag}`)_\n"
                );
            }
            line
        }
        StageOutcome::Failed { reason } => format!("**Summary:** {reason}\n\n"),
    }
}

fn sentiment_line(sentiment: &StageOutcome<Sentiment>) -> String {
    match sentiment {
        StageOutcome::Ok { value } => format!(
            "**Sentiment Analysis:** {} (Confidence: {:.2})\n\n",
            value.label(),
            value.score
        ),
        StageOutcome::Failed { reason } => format!(
            "**Sentiment Analysis:** {} (Confidence: {:.2})\n\n_{reason}_\n\n",
            Sentiment::ERROR_LABEL,
            0.0
        ),
    }
}
