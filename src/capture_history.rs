//! Every capture of every group, including each iteration of a repeated group.
//!
//! The regex engine only remembers the last iteration of a repeated group: matching `(?:(\d+) ?)+`
//! against `"1 2 3"` reports `(\d+)` as `"3"`. To bind repetitions to collections, all iterations are
//! needed. They are recovered by "peeling": each repetition that contains capture groups is compiled
//! into a small extra regex that matches exactly one iteration followed by the rest of the repetition.
//! Running it repeatedly over the text the repetition matched yields the iterations one by one, in the
//! order the engine matched them.

use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use regex_automata::{meta, util::captures::Captures, Anchored, Input};
use regex_syntax::hir::{self, Hir, HirKind, Look};

use crate::PatternError;

/// A byte range in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset after the last byte
    pub end: usize,
}

impl Span {
    /// Creates a new span. `start` must not be greater than `end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
    /// Number of bytes in the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    /// `true` if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
    /// `true` if `other` lies within `self`.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<regex_automata::Span> for Span {
    fn from(span: regex_automata::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

/// One capture of one group: the captured text and where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'h> {
    text: &'h str,
    span: Span,
}

impl<'h> Capture<'h> {
    /// The captured text.
    pub fn text(&self) -> &'h str {
        self.text
    }
    /// Offset of the capture in the input.
    pub fn start(&self) -> usize {
        self.span.start
    }
    /// Offset after the end of the capture.
    pub fn end(&self) -> usize {
        self.span.end
    }
    /// Location of the capture in the input.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// The result of a successful match: for each group, each of its captures in the order they were
/// made.
///
/// ```
/// # use regextract::*;
/// let plan = Plan::<Vec<u32>>::new(r"(?:(\d+),?)+").unwrap();
/// let history = plan.captures("10,20,30").unwrap();
///
/// let texts: Vec<_> = history.captures(1).map(|c| c.text()).collect();
/// assert_eq!(texts, ["10", "20", "30"]);
/// assert_eq!(history.get(0).unwrap().text(), "10,20,30");
/// ```
#[derive(Debug, Clone)]
pub struct CaptureHistory<'h> {
    haystack: &'h str,
    groups: Vec<Vec<Span>>,
    repetitions: Vec<Iterations>,
}

impl<'h> CaptureHistory<'h> {
    /// The input that was matched.
    pub fn haystack(&self) -> &'h str {
        self.haystack
    }

    /// Number of groups in the pattern, including group `0`.
    pub fn group_len(&self) -> usize {
        self.groups.len()
    }

    /// All captures of `group`, in order.
    pub fn captures(&self, group: usize) -> impl Iterator<Item = Capture<'h>> + '_ {
        self.spans(group).iter().map(|&span| self.capture(span))
    }

    /// The last capture of `group`, which is the one the regex engine itself reports.
    pub fn get(&self, group: usize) -> Option<Capture<'h>> {
        self.spans(group).last().map(|&span| self.capture(span))
    }

    /// The text covered by `span`.
    pub fn text(&self, span: Span) -> &'h str {
        self.haystack.get(span.start..span.end).unwrap_or("")
    }

    /// The captures of `group` that lie within `outer`.
    pub fn within(&self, group: usize, outer: Span) -> impl Iterator<Item = Span> + '_ {
        self.spans(group)
            .iter()
            .copied()
            .filter(move |&span| outer.contains(span))
    }

    /// The last capture of `group` that lies within `outer`.
    pub fn last_within(&self, group: usize, outer: Span) -> Option<Span> {
        self.spans(group)
            .iter()
            .rev()
            .copied()
            .find(|&span| outer.contains(span))
    }

    /// The iterations within `outer` of the innermost repetition that contains all of `groups`.
    /// `None` if no repetition contains them.
    pub(crate) fn iterations(
        &self,
        groups: &[usize],
        outer: Span,
    ) -> Option<impl Iterator<Item = Span> + '_> {
        if groups.is_empty() {
            return None;
        }
        // nested repetitions come after the ones around them
        let repetition = self
            .repetitions
            .iter()
            .rev()
            .filter(|repetition| groups.iter().all(|group| repetition.groups.contains(group)))
            .min_by_key(|repetition| repetition.groups.len())?;
        Some(
            repetition
                .spans
                .iter()
                .copied()
                .filter(move |&span| outer.contains(span)),
        )
    }

    fn spans(&self, group: usize) -> &[Span] {
        self.groups.get(group).map_or(&[], |spans| spans.as_slice())
    }

    fn capture(&self, span: Span) -> Capture<'h> {
        Capture {
            text: self.text(span),
            span,
        }
    }
}

/// Where the instrumented regex keeps the capture of an original group.
#[derive(Debug)]
enum Slot {
    /// A group outside of any capturing repetition.
    Group {
        /// Index in the instrumented regex
        local: usize,
        /// Index in the original pattern
        group: usize,
        children: Vec<Slot>,
    },
    /// A repetition that contains groups. `local` captures the whole repetition.
    Repeat { local: usize, peeler: Arc<Peeler> },
}

/// The iterations of one capturing repetition.
#[derive(Debug, Clone)]
struct Iterations {
    /// The original groups inside the repetition
    groups: Range<usize>,
    spans: Vec<Span>,
}

/// Captures collected while recording one match.
#[derive(Debug)]
struct Recording<'h> {
    haystack: &'h str,
    groups: Vec<Vec<Span>>,
    iterations: Vec<Vec<Span>>,
}

/// Runs a pattern and records the full capture history of each match.
#[derive(Debug)]
pub(crate) struct Matcher {
    regex: meta::Regex,
    slots: Vec<Slot>,
    names: Vec<Option<String>>,
    /// The groups inside each capturing repetition, by repetition id
    repetitions: Vec<Range<usize>>,
}

impl Matcher {
    pub(crate) fn new(hir: &Hir) -> Result<Self, PatternError> {
        let mut names = vec![None];
        collect_names(hir, &mut names);

        let mut next = 1;
        let mut repetitions = vec![];
        let mut slots = vec![];
        let instrumented = instrument(hir, &mut next, &mut repetitions, &mut slots)?;
        let regex = compile(&instrumented)?;

        Ok(Self {
            regex,
            slots,
            names,
            repetitions,
        })
    }

    /// The engine's name for each group index. `None` for numbered groups.
    pub(crate) fn names(&self) -> &[Option<String>] {
        &self.names
    }

    pub(crate) fn captures<'h>(&self, haystack: &'h str) -> Option<CaptureHistory<'h>> {
        let mut caps = self.regex.create_captures();
        self.regex.search_captures(&Input::new(haystack), &mut caps);
        let full = caps.get_group(0)?;

        let mut recording = Recording {
            haystack,
            groups: vec![vec![]; self.names.len()],
            iterations: vec![vec![]; self.repetitions.len()],
        };
        recording.groups[0].push(full.into());
        record(&caps, &self.slots, &mut recording);

        let repetitions = self
            .repetitions
            .iter()
            .cloned()
            .zip(recording.iterations)
            .map(|(groups, spans)| Iterations { groups, spans })
            .collect();
        Some(CaptureHistory {
            haystack,
            groups: recording.groups,
            repetitions,
        })
    }
}

/// Bounds of the part of a repetition that follows one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Rest {
    min: u32,
    max: Option<u32>,
    /// Whether the text after the repetition starts with a character
    trailing: bool,
}

/// Splits the text of a repetition into its iterations.
///
/// Iteration `k` is found by matching one iteration followed by what remains of the repetition
/// after `k + 1` iterations, anchored at both ends of the remaining text. Among all ways to do so,
/// the engine's priority picks the same one it picked for the whole match.
#[derive(Debug)]
struct Peeler {
    id: usize,
    /// Capture `1` around one instrumented iteration
    iteration: Hir,
    /// One iteration without captures
    stripped: Hir,
    min: u32,
    max: Option<u32>,
    greedy: bool,
    regexes: DashMap<Rest, Arc<meta::Regex>>,
    slots: Vec<Slot>,
}

impl Peeler {
    fn new(
        id: usize,
        repetition: &hir::Repetition,
        repetitions: &mut Vec<Range<usize>>,
    ) -> Result<Self, PatternError> {
        let mut next = 2;
        let mut slots = vec![];
        let iteration = Hir::capture(hir::Capture {
            index: 1,
            name: None,
            sub: Box::new(instrument(
                &repetition.sub,
                &mut next,
                repetitions,
                &mut slots,
            )?),
        });

        let peeler = Self {
            id,
            iteration,
            stripped: strip(&repetition.sub),
            min: repetition.min,
            max: repetition.max,
            greedy: repetition.greedy,
            regexes: DashMap::new(),
            slots,
        };
        // the first iteration has the largest rest, so every later regex builds if this one does
        peeler.regex(peeler.rest(0, false))?;
        Ok(peeler)
    }

    fn rest(&self, index: u32, trailing: bool) -> Rest {
        Rest {
            min: self.min.saturating_sub(index + 1),
            max: self.max.map(|max| max.saturating_sub(index + 1)),
            trailing,
        }
    }

    fn regex(&self, rest: Rest) -> Result<Arc<meta::Regex>, PatternError> {
        if let Some(regex) = self.regexes.get(&rest) {
            return Ok(Arc::clone(&regex));
        }
        let mut parts = vec![
            self.iteration.clone(),
            Hir::repetition(hir::Repetition {
                min: rest.min,
                max: rest.max,
                greedy: self.greedy,
                sub: Box::new(self.stripped.clone()),
            }),
        ];
        if rest.trailing {
            parts.push(Hir::dot(hir::Dot::AnyChar));
        }
        parts.push(Hir::look(Look::End));

        let regex = Arc::new(compile(&Hir::concat(parts))?);
        self.regexes.insert(rest, Arc::clone(&regex));
        Ok(regex)
    }

    fn peel(&self, span: Span, recording: &mut Recording) {
        let haystack = recording.haystack;
        // assertions at the end of the repetition see the character after it
        let next = haystack
            .get(span.end..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let context = &haystack.as_bytes()[..span.end + next];

        let mut at = span.start;
        let mut count = 0;
        while self.max.map_or(true, |max| count < max) {
            let regex = match self.regex(self.rest(count, next > 0)) {
                Ok(regex) => regex,
                Err(err) => {
                    tracing::warn!(%err, "cannot split repetition");
                    break;
                }
            };
            let mut caps = regex.create_captures();
            let input = Input::new(context).range(at..).anchored(Anchored::Yes);
            regex.search_captures(&input, &mut caps);
            let iteration = match caps.get_group(1) {
                Some(iteration) => iteration,
                None => break,
            };
            recording.iterations[self.id].push(iteration.into());
            record(&caps, &self.slots, recording);
            count += 1;

            if iteration.end == at || iteration.end >= span.end {
                break;
            }
            at = iteration.end;
        }
        tracing::trace!(count, start = span.start, end = span.end, "peeled repetition");
    }
}

fn compile(hir: &Hir) -> Result<meta::Regex, PatternError> {
    meta::Regex::builder()
        .build_from_hir(hir)
        .map_err(|err| PatternError::Build(Box::new(err)))
}

fn record(caps: &Captures, slots: &[Slot], recording: &mut Recording) {
    for slot in slots {
        match slot {
            Slot::Group {
                local,
                group,
                children,
            } => {
                if let Some(span) = caps.get_group(*local) {
                    recording.groups[*group].push(span.into());
                    record(caps, children, recording);
                }
            }
            Slot::Repeat { local, peeler } => {
                if let Some(span) = caps.get_group(*local) {
                    peeler.peel(span.into(), recording);
                }
            }
        }
    }
}

/// A repetition that can run more than once and contains capture groups.
fn is_capturing_repetition(repetition: &hir::Repetition) -> bool {
    let repeats = repetition.max.map_or(true, |max| max > 1);
    repeats && repetition.sub.properties().explicit_captures_len() > 0
}

/// Renumbers the capture groups of `hir` in order, starting at `next`, and replaces each capturing
/// repetition with a single group around the whole repetition.
fn instrument(
    hir: &Hir,
    next: &mut usize,
    repetitions: &mut Vec<Range<usize>>,
    slots: &mut Vec<Slot>,
) -> Result<Hir, PatternError> {
    Ok(match hir.kind() {
        HirKind::Capture(capture) => {
            let local = take(next);
            let mut children = vec![];
            let sub = instrument(&capture.sub, next, repetitions, &mut children)?;
            slots.push(Slot::Group {
                local,
                group: capture.index as usize,
                children,
            });
            local_capture(local, sub)
        }
        HirKind::Repetition(repetition) if is_capturing_repetition(repetition) => {
            let local = take(next);
            let id = repetitions.len();
            repetitions.push(group_range(&repetition.sub));
            let peeler = Arc::new(Peeler::new(id, repetition, repetitions)?);
            slots.push(Slot::Repeat { local, peeler });
            let whole = Hir::repetition(hir::Repetition {
                sub: Box::new(strip(&repetition.sub)),
                ..repetition.clone()
            });
            local_capture(local, whole)
        }
        HirKind::Repetition(repetition) => Hir::repetition(hir::Repetition {
            sub: Box::new(instrument(&repetition.sub, next, repetitions, slots)?),
            ..repetition.clone()
        }),
        HirKind::Concat(subs) => Hir::concat(
            subs.iter()
                .map(|sub| instrument(sub, next, repetitions, slots))
                .collect::<Result<_, _>>()?,
        ),
        HirKind::Alternation(subs) => Hir::alternation(
            subs.iter()
                .map(|sub| instrument(sub, next, repetitions, slots))
                .collect::<Result<_, _>>()?,
        ),
        _ => hir.clone(),
    })
}

fn take(next: &mut usize) -> usize {
    let index = *next;
    *next += 1;
    index
}

fn local_capture(index: usize, sub: Hir) -> Hir {
    Hir::capture(hir::Capture {
        index: index as u32,
        name: None,
        sub: Box::new(sub),
    })
}

/// Removes all capture groups, keeping their contents.
fn strip(hir: &Hir) -> Hir {
    match hir.kind() {
        HirKind::Capture(capture) => strip(&capture.sub),
        HirKind::Repetition(repetition) => Hir::repetition(hir::Repetition {
            sub: Box::new(strip(&repetition.sub)),
            ..repetition.clone()
        }),
        HirKind::Concat(subs) => Hir::concat(subs.iter().map(strip).collect()),
        HirKind::Alternation(subs) => Hir::alternation(subs.iter().map(strip).collect()),
        _ => hir.clone(),
    }
}

/// The indices of the groups in `hir`, which are always consecutive.
fn group_range(hir: &Hir) -> Range<usize> {
    match hir.kind() {
        HirKind::Capture(capture) => {
            let index = capture.index as usize;
            index..group_range(&capture.sub).end.max(index + 1)
        }
        HirKind::Repetition(repetition) => group_range(&repetition.sub),
        HirKind::Concat(subs) | HirKind::Alternation(subs) => subs
            .iter()
            .map(group_range)
            .filter(|range| !range.is_empty())
            .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end))
            .unwrap_or(0..0),
        _ => 0..0,
    }
}

fn collect_names(hir: &Hir, names: &mut Vec<Option<String>>) {
    match hir.kind() {
        HirKind::Capture(capture) => {
            let index = capture.index as usize;
            if names.len() <= index {
                names.resize(index + 1, None);
            }
            names[index] = capture.name.as_deref().map(String::from);
            collect_names(&capture.sub, names);
        }
        HirKind::Repetition(repetition) => collect_names(&repetition.sub, names),
        HirKind::Concat(subs) | HirKind::Alternation(subs) => {
            for sub in subs {
                collect_names(sub, names);
            }
        }
        _ => {}
    }
}
