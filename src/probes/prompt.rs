/// Rough average for English text. No tokenizer runs locally, so every
/// target size is an approximation scaled by this ratio.
pub const CHARS_PER_TOKEN: f64 = 3.5;

// ASCII only, so byte-index truncation below is always on a char boundary.
const FILLER: &str = "\
Inference servers expose a small number of HTTP endpoints that accept a model \
name, a prompt or a list of chat messages, and a handful of sampling \
parameters. The server tokenizes the input, schedules it onto one or more \
accelerator devices, and generates completion tokens one at a time until it \
reaches a stop condition or the requested token budget. Throughput depends on \
batch size, context length, quantization format, and the memory bandwidth of \
the device, while latency is dominated by prompt processing for long inputs. \
Operators typically monitor tokens per second, time to first token, and \
device memory headroom, because an overloaded server degrades in \
characteristic ways: requests queue, context windows overflow, or the \
runtime aborts an allocation. Smoke tests therefore exercise each endpoint \
with known inputs and compare observed behavior against these expectations. \
A summary at the end of each run records which probes passed, how long each \
request took, and how many tokens the service reported processing. \
";

/// Synthesize filler text of approximately `target_tokens` tokens by
/// repeating the base passage and trimming to the target character count.
/// The result's byte length is within one passage length of
/// `target_tokens * CHARS_PER_TOKEN`.
pub fn synthesize_document(target_tokens: u64) -> String {
    let target_chars = (target_tokens as f64 * CHARS_PER_TOKEN) as usize;
    let repetitions = std::cmp::max(1, target_chars / FILLER.len());

    let mut content = FILLER.repeat(repetitions);
    if content.len() > target_chars {
        content.truncate(target_chars);
    }
    content
}

pub fn estimated_tokens(text: &str) -> f64 {
    text.len() as f64 / CHARS_PER_TOKEN
}

/// Wrap a synthesized document in the instruction used by sweep probes.
pub fn summary_request(document: &str) -> String {
    format!(
        "Here is a document about LLM inference serving:\n\n{}\n\n\
         Based on this document, provide a concise summary of the key points \
         mentioned. Keep your response under 100 words.",
        document
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_length_within_tolerance() {
        for target in [100u64, 1_000, 10_000, 100_000] {
            let document = synthesize_document(target);
            let target_chars = (target as f64 * CHARS_PER_TOKEN) as usize;
            let diff = target_chars.abs_diff(document.len());
            assert!(
                diff <= FILLER.len(),
                "target {} tokens: length {} is {} bytes off target {}",
                target,
                document.len(),
                diff,
                target_chars
            );
        }
    }

    #[test]
    fn test_small_target_still_produces_text() {
        let document = synthesize_document(10);
        assert_eq!(document.len(), 35);
    }

    #[test]
    fn test_estimated_tokens_round_trip() {
        let document = synthesize_document(1_000);
        let estimate = estimated_tokens(&document);
        assert!((estimate - 1_000.0).abs() < FILLER.len() as f64 / CHARS_PER_TOKEN);
    }

    #[test]
    fn test_summary_request_embeds_document() {
        let request = summary_request("DOC BODY");
        assert!(request.contains("DOC BODY"));
        assert!(request.contains("concise summary"));
    }
}
