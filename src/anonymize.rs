//! Author pseudonymization for comment tables
//!
//! Authors become `User1`, `User2`, ... in first-encounter order and every
//! literal @-mention of an original author inside comment text is rewritten to
//! the pseudonym. One exempt identity (the channel's own account) is left alone.

use std::collections::HashMap;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::Comment;

const PSEUDONYM_PREFIX: &str = "User";

/// Original identity -> pseudonym, in assignment order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorMap {
    entries: Vec<(String, String)>,
    /// original -> position in `entries`
    index: HashMap<String, usize>,
}

impl AuthorMap {
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, p)| (o.as_str(), p.as_str()))
    }

    fn pseudonym_for(&mut self, original: &str) -> String {
        if let Some(existing) = self.get(original) {
            return existing.to_string();
        }
        let pseudonym = format!("{}{}", PSEUDONYM_PREFIX, self.entries.len() + 1);
        self.index.insert(original.to_string(), self.entries.len());
        self.entries.push((original.to_string(), pseudonym.clone()));
        pseudonym
    }
}

/// Comments whose authors have been replaced.
///
/// Kept as its own type so anonymized output can't be passed to
/// [`Anonymizer::anonymize`] by accident. Comments taken back out with
/// [`into_parts`](Self::into_parts) stay marked and are rejected if fed in again.
#[derive(Debug, Clone)]
pub struct AnonymizedComments {
    comments: Vec<Comment>,
    authors: AuthorMap,
}

impl AnonymizedComments {
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn authors(&self) -> &AuthorMap {
        &self.authors
    }

    pub fn into_parts(self) -> (Vec<Comment>, AuthorMap) {
        (self.comments, self.authors)
    }
}

pub struct Anonymizer {
    exempt: String,
}

impl Anonymizer {
    pub fn new(exempt: impl Into<String>) -> Self {
        Self { exempt: exempt.into() }
    }

    /// Replace authors and their mentions.
    ///
    /// Fails with [`Error::AlreadyAnonymized`] if any comment came out of a
    /// previous run, since a second pass would remap pseudonyms as new people.
    /// Author names are never inspected for this, so a real `User7` is fine.
    pub fn anonymize(&self, mut comments: Vec<Comment>) -> Result<AnonymizedComments> {
        if let Some(c) = comments.iter().find(|c| c.anonymized) {
            return Err(Error::AlreadyAnonymized(c.comment_id.clone()));
        }

        let mut authors = AuthorMap::default();
        for comment in comments.iter_mut() {
            if comment.author != self.exempt {
                comment.author = authors.pseudonym_for(&comment.author);
            }
        }

        let rewriter = MentionRewriter::new(&authors, &self.exempt);
        for comment in comments.iter_mut() {
            comment.text = rewriter.rewrite(&comment.text);
            comment.text_translated = comment.text_translated.as_deref().map(|t| rewriter.rewrite(t));
            comment.anonymized = true;
        }

        info!(
            "Anonymized {} authors across {} comments",
            authors.len(),
            comments.len()
        );
        Ok(AnonymizedComments { comments, authors })
    }
}

/// How an identity is written when mentioned. Platform handles already carry the `@`.
fn mention_of(identity: &str) -> String {
    if identity.starts_with('@') {
        identity.to_string()
    } else {
        format!("@{}", identity)
    }
}

/// Single-pass literal replacement of mentions.
///
/// At each `@` the longest matching mention wins and replaced text is never
/// scanned again, so `@bob` can't clobber `@bobby` and a pseudonym can't be
/// rewritten by a later entry.
struct MentionRewriter {
    /// (mention, replacement), longest mention first
    mentions: Vec<(String, String)>,
}

impl MentionRewriter {
    fn new(authors: &AuthorMap, exempt: &str) -> Self {
        let mut mentions: Vec<(String, String)> = authors
            .iter()
            .map(|(original, pseudonym)| (mention_of(original), format!("@{}", pseudonym)))
            .collect();
        // the exempt mention maps to itself so shorter author names can't eat into it
        let exempt = mention_of(exempt);
        mentions.push((exempt.clone(), exempt));
        mentions.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { mentions }
    }

    fn rewrite(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(at) = rest.find('@') {
            out.push_str(&rest[..at]);
            let tail = &rest[at..];
            match self.mentions.iter().find(|(m, _)| tail.starts_with(m.as_str())) {
                Some((mention, replacement)) => {
                    out.push_str(replacement);
                    rest = &tail[mention.len()..];
                }
                None => {
                    out.push('@');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
