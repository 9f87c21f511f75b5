// Normalizer: the top-level handle tying tokenizer, taggers, verbalizer and
// post-processing together.
//
// Text is tokenized and every span of up to `span_tokens` content tokens is
// tried against the classify grammar. Address regions found by the
// contextual scanner are added as further spans, and every token can also
// pass through unchanged at a high cost. The cheapest segmentation wins;
// ties go to the lexicographically smaller tag string.

use std::sync::Arc;

use hashbrown::HashSet;
use serde::Serialize;
use tnorm_core::character::decompose_nukta;
use tnorm_core::tag::{parse_tags, TagError, TagNode};
use tnorm_core::token::{Token, TokenWindow};
use tnorm_fst::candidate::rank;
use tnorm_fst::{Candidate, FstError, Grammar, Weight};
use tracing::{info, instrument, warn};

use crate::cache::{self, ArchiveOptions};
use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::tables::RuleTables;
use crate::taggers::classify::{
    build_address_words, build_classify, measure_token, name_token, CLASS_WEIGHT,
};
use crate::taggers::{ContextualAddress, StructuredAddress};
use crate::tokenizer::content_tokens;
use crate::verbalizers::{build_post_processor, build_verbalizer, post_process};

/// Longest number or measure span, in content tokens. Spans are extended
/// to the longest structured address when that is longer.
pub const MAX_SPAN_TOKENS: usize = 11;

/// Cost of passing one token through unchanged.
pub const PASS_THROUGH_WEIGHT: f32 = 100.0;

// ---------------------------------------------------------------------------
// Tagging results
// ---------------------------------------------------------------------------

/// One segment of tagged text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Text matched by a grammar.
    Tagged {
        text: String,
        tagged: String,
        weight: f64,
    },
    /// Text no grammar matched, passed through verbatim.
    Unrecognized { text: String },
}

impl Segment {
    /// Source text of the segment, whitespace runs collapsed.
    pub fn text(&self) -> &str {
        match self {
            Segment::Tagged { text, .. } | Segment::Unrecognized { text } => text,
        }
    }

    /// Tag string of the segment. Unrecognized text is tagged as
    /// `tokens { name: "…" }`.
    pub fn tagged(&self) -> String {
        match self {
            Segment::Tagged { tagged, .. } => tagged.clone(),
            Segment::Unrecognized { text } => name_token(text),
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Segment::Tagged { .. })
    }

    /// The tag string as a tree.
    pub fn tags(&self) -> Result<Vec<TagNode>, TagError> {
        parse_tags(&self.tagged())
    }
}

/// Tagging of a whole input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tagged {
    pub text: String,
    pub segments: Vec<Segment>,
}

impl Tagged {
    /// Tag strings of all segments, space separated.
    pub fn tagged(&self) -> String {
        self.segments
            .iter()
            .map(Segment::tagged)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// A candidate span over content tokens `first..=last`.
#[derive(Debug, Clone)]
struct Edge {
    first: usize,
    last: usize,
    tagged: String,
    weight: Weight,
    recognized: bool,
}

/// A partial segmentation: total weight, tag strings joined, edge indices.
#[derive(Debug, Clone)]
struct Path {
    weight: Weight,
    key: String,
    edges: Vec<usize>,
}

impl Path {
    fn extend(&self, index: usize, edge: &Edge) -> Path {
        let mut key = self.key.clone();
        if !key.is_empty() {
            key.push(' ');
        }
        key.push_str(&edge.tagged);
        let mut edges = self.edges.clone();
        edges.push(index);
        Path {
            weight: self.weight.times(edge.weight),
            key,
            edges,
        }
    }
}

/// The `k` cheapest segmentations of `token_count` tokens into `edges`, in
/// ascending (weight, tag string) order.
fn best_paths(token_count: usize, edges: &[Edge], k: usize) -> Vec<Path> {
    let mut ending: Vec<Vec<usize>> = vec![Vec::new(); token_count + 1];
    for (i, edge) in edges.iter().enumerate() {
        ending[edge.last + 1].push(i);
    }
    let mut best: Vec<Vec<Path>> = vec![Vec::new(); token_count + 1];
    best[0].push(Path {
        weight: Weight::one(),
        key: String::new(),
        edges: Vec::new(),
    });
    for end in 1..=token_count {
        let mut paths: Vec<Path> = Vec::new();
        for &i in &ending[end] {
            let edge = &edges[i];
            for prefix in &best[edge.first] {
                paths.push(prefix.extend(i, edge));
            }
        }
        paths.sort_by(|a, b| (a.weight, &a.key).cmp(&(b.weight, &b.key)));
        let mut seen: HashSet<String> = HashSet::new();
        paths.retain(|p| seen.insert(p.key.clone()));
        paths.truncate(k);
        best[end] = paths;
    }
    std::mem::take(&mut best[token_count])
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Hindi text normalizer.
///
/// Construction builds (or fetches from the process-wide cache) the
/// classify, address word, verbalizer and post-processing grammars; the
/// handle itself is immutable and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
    config_key: String,
    /// Longest span tried against the classify grammar.
    span_tokens: usize,
    classify: Arc<Grammar>,
    verbalize: Arc<Grammar>,
    post_process: Arc<Grammar>,
    address: ContextualAddress,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizeError> {
        let source = config.table_source();
        let tables = RuleTables::load(source.as_ref())?;
        let key = format!("{}_{}", config.input_case.as_str(), source.id());
        let archive = ArchiveOptions {
            dir: config.cache_dir.as_deref(),
            overwrite: config.overwrite_cache,
        };

        let classify = cache::get_or_build(cache::CLASSIFY, &key, archive, || {
            build_classify(&tables)
        })?;
        let words = cache::get_or_build(cache::ADDRESS_WORDS, &key, archive, || {
            build_address_words(&tables, config.input_case)
        })?;
        let verbalize =
            cache::get_or_build(cache::VERBALIZE, cache::SHARED_KEY, archive, build_verbalizer)?;
        let post_process = cache::get_or_build(
            cache::POST_PROCESS,
            cache::SHARED_KEY,
            archive,
            build_post_processor,
        )?;
        let address = ContextualAddress::new(words, &tables, config.input_case);
        let span_tokens = MAX_SPAN_TOKENS.max(StructuredAddress::max_tokens(&tables));

        info!(
            config_key = %key,
            deterministic = config.deterministic,
            span_tokens,
            "normalizer ready"
        );
        Ok(Self {
            config,
            config_key: key,
            span_tokens,
            classify,
            verbalize,
            post_process,
            address,
        })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Cache key of the configuration-dependent grammars:
    /// `<input_case>_<table source id>`.
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    /// Best normalization of `text`.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub fn normalize(&self, text: &str) -> Result<String, NormalizeError> {
        let text = self.check_input(text)?;
        let tokens = content_tokens(&text);
        let edges = self.edges(&tokens, 1)?;
        let paths = best_paths(tokens.len(), &edges, 1);
        Ok(paths
            .first()
            .map(|path| self.render(&tokens, &edges, path))
            .unwrap_or_default())
    }

    /// Up to `n` distinct normalizations in ascending weight order.
    ///
    /// A deterministic normalizer returns one candidate; otherwise `n` is
    /// capped by `max_candidates`.
    pub fn normalize_candidates(
        &self,
        text: &str,
        n: usize,
    ) -> Result<Vec<Candidate>, NormalizeError> {
        let text = self.check_input(text)?;
        let k = if self.config.deterministic {
            1
        } else {
            n.min(self.config.max_candidates).max(1)
        };
        let tokens = content_tokens(&text);
        let edges = self.edges(&tokens, k)?;
        let paths = best_paths(tokens.len(), &edges, k);
        let mut ranked = rank(
            paths
                .iter()
                .map(|path| Candidate::new(self.render(&tokens, &edges, path), path.weight)),
        );
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Segments of the best tagging of `text`.
    pub fn tag(&self, text: &str) -> Result<Tagged, NormalizeError> {
        let text = self.check_input(text)?;
        let tokens = content_tokens(&text);
        let edges = self.edges(&tokens, 1)?;
        let segments = best_paths(tokens.len(), &edges, 1)
            .first()
            .map(|path| {
                path.edges
                    .iter()
                    .map(|&i| {
                        let edge = &edges[i];
                        let span = TokenWindow::new(edge.first, edge.last).text(&tokens);
                        if edge.recognized {
                            Segment::Tagged {
                                text: span,
                                tagged: edge.tagged.clone(),
                                weight: edge.weight.value(),
                            }
                        } else {
                            Segment::Unrecognized { text: span }
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Tagged {
            text: text.into_owned(),
            segments,
        })
    }

    fn check_input<'t>(&self, text: &'t str) -> Result<std::borrow::Cow<'t, str>, NormalizeError> {
        let len = text.chars().count();
        if len > self.config.max_input_chars {
            return Err(NormalizeError::InputTooLong {
                len,
                max: self.config.max_input_chars,
            });
        }
        Ok(decompose_nukta(text))
    }

    /// Every candidate span: up to `k` readings per classified span, the
    /// address regions, and one pass-through edge per token.
    fn edges(&self, tokens: &[Token], k: usize) -> Result<Vec<Edge>, NormalizeError> {
        let mut edges = Vec::new();
        for first in 0..tokens.len() {
            edges.push(Edge {
                first,
                last: first,
                tagged: name_token(&tokens[first].text),
                weight: Weight::new(PASS_THROUGH_WEIGHT),
                recognized: false,
            });
            for last in first..tokens.len().min(first + self.span_tokens) {
                let span = TokenWindow::new(first, last).text(tokens);
                if !self.classify.is_viable_prefix(&span) {
                    break;
                }
                let readings = match self.classify.candidates(&span, k) {
                    Ok(readings) => readings,
                    Err(FstError::Unrecognized { .. }) => continue,
                    Err(err) => return Err(err.into()),
                };
                edges.extend(readings.into_iter().map(|c| Edge {
                    first,
                    last,
                    tagged: c.output,
                    weight: c.weight,
                    recognized: true,
                }));
            }
        }
        for m in self.address.scan(tokens) {
            edges.push(Edge {
                first: m.first,
                last: m.last,
                tagged: measure_token(&m.tagged),
                weight: m.weight.times(Weight::new(CLASS_WEIGHT)),
                recognized: true,
            });
        }
        Ok(edges)
    }

    fn render(&self, tokens: &[Token], edges: &[Edge], path: &Path) -> String {
        let mut out = String::new();
        let mut previous: Option<&Edge> = None;
        for &i in &path.edges {
            let edge = &edges[i];
            if let Some(prev) = previous {
                if tokens[edge.first].pos > tokens[prev.last].end() {
                    out.push(' ');
                }
            }
            let span = TokenWindow::new(edge.first, edge.last).text(tokens);
            if edge.recognized {
                match self.verbalize.apply(&edge.tagged) {
                    Ok(spoken) => out.push_str(&spoken),
                    Err(err) => {
                        warn!(tagged = %edge.tagged, error = %err, "verbalization failed, keeping source text");
                        out.push_str(&span);
                    }
                }
            } else {
                out.push_str(&span);
            }
            previous = Some(edge);
        }
        match post_process(&self.post_process, &out) {
            Ok(processed) => processed,
            Err(err) => {
                warn!(error = %err, "post-processing failed, returning unprocessed text");
                out
            }
        }
    }
}
