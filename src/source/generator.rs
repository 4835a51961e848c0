use serde_json::Value;
use std::io::{self, BufRead, BufReader, Read};
use tracing::{debug, info};

use crate::data::{Example, RawRecord};
use crate::errors::LoaderError;
use crate::transport::ArchiveMember;
use crate::types::{ExampleId, MemberPath};

/// Stream examples for `target_path` out of a lazy member sequence.
///
/// Members with other paths are skipped unread. The first member whose path
/// equals `target_path` is read line by line; each line becomes one example
/// whose id is its zero-based line index. The sequence ends once that member
/// is exhausted, or is empty when no member matches.
pub fn generate_examples<I, R>(
    target_path: impl Into<MemberPath>,
    members: I,
) -> ExampleGenerator<I::IntoIter, R>
where
    I: IntoIterator<Item = Result<ArchiveMember<R>, LoaderError>>,
    R: Read,
{
    ExampleGenerator {
        target_path: target_path.into(),
        members: members.into_iter(),
        state: GeneratorState::Scanning,
    }
}

enum GeneratorState<R> {
    Scanning,
    Streaming {
        lines: io::Split<BufReader<R>>,
        next_id: ExampleId,
    },
    Finished,
}

/// Lazy, non-restartable iterator of `(id, example)` pairs for one split.
///
/// The first error ends the sequence: it is yielded once and every later call
/// returns `None`.
pub struct ExampleGenerator<I, R> {
    target_path: MemberPath,
    members: I,
    state: GeneratorState<R>,
}

impl<I, R> ExampleGenerator<I, R> {
    /// Member path this generator is looking for.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }
}

impl<I, R> Iterator for ExampleGenerator<I, R>
where
    I: Iterator<Item = Result<ArchiveMember<R>, LoaderError>>,
    R: Read,
{
    type Item = Result<(ExampleId, Example), LoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                GeneratorState::Finished => return None,
                GeneratorState::Scanning => match self.members.next() {
                    None => {
                        debug!(
                            "[allocine:generate] no member '{}' in archive",
                            self.target_path
                        );
                        self.state = GeneratorState::Finished;
                        return None;
                    }
                    Some(Err(err)) => {
                        self.state = GeneratorState::Finished;
                        return Some(Err(err));
                    }
                    Some(Ok(member)) if member.path != self.target_path => continue,
                    Some(Ok(member)) => {
                        debug!("[allocine:generate] streaming member '{}'", member.path);
                        self.state = GeneratorState::Streaming {
                            lines: BufReader::new(member.stream).split(b'\n'),
                            next_id: 0,
                        };
                    }
                },
                GeneratorState::Streaming { lines, next_id } => {
                    let id = *next_id;
                    *next_id += 1;
                    let item = match lines.next() {
                        None => None,
                        Some(Err(source)) => Some(Err(LoaderError::MemberRead {
                            member: self.target_path.clone(),
                            line: id,
                            source,
                        })),
                        Some(Ok(bytes)) => {
                            Some(decode_line(&self.target_path, id, bytes).map(|ex| (id, ex)))
                        }
                    };
                    match item {
                        Some(Ok(pair)) => return Some(Ok(pair)),
                        None => {
                            info!(
                                "[allocine:generate] member '{}' done: {} example(s)",
                                self.target_path, id
                            );
                            self.state = GeneratorState::Finished;
                            return None;
                        }
                        Some(Err(err)) => {
                            self.state = GeneratorState::Finished;
                            return Some(Err(err));
                        }
                    }
                }
            }
        }
    }
}

/// Decode one raw line (without its `\n`) into an example.
fn decode_line(member: &str, line: ExampleId, bytes: Vec<u8>) -> Result<Example, LoaderError> {
    let text = String::from_utf8(bytes).map_err(|source| LoaderError::Decode {
        member: member.to_string(),
        line,
        source,
    })?;
    let raw = serde_json::from_str::<Value>(&text)
        .and_then(RawRecord::from_value)
        .map_err(|source| LoaderError::Parse {
            member: member.to_string(),
            line,
            source,
        })?;
    Ok(Example::from(raw))
}
