//! Context assembly and the grounding contract prompt

use crate::grounding::ABSTENTION_PHRASE;
use crate::retrieval::ScoredPassage;

/// Build the context block handed to the generator
///
/// Each passage is labeled with its id, document, and page so the generator
/// can reference them in citations.
pub fn build_context(passages: &[ScoredPassage]) -> String {
    let blocks: Vec<String> = passages
        .iter()
        .map(|scored| {
            let p = &scored.passage;
            let page = p
                .page_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!(
                "[Passage {}] (Document: {}, Page: {})\n{}\n",
                p.passage_id, p.document_title, page, p.text
            )
        })
        .collect();
    blocks.join("\n---\n")
}

/// Build the full contract prompt for one question
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are an assistant that answers ONLY from the provided context.\n\
         \n\
         RULES:\n\
         1. Answer ONLY using the context below.\n\
         2. If the context does not contain the information needed, say: \"{abstain}.\"\n\
         3. For every factual statement, provide a citation with the passage id and an exact quote (1-2 sentences) copied verbatim from that passage.\n\
         4. Do NOT add information from outside the context.\n\
         5. If you are unsure, say so plainly.\n\
         \n\
         RESPONSE FORMAT:\n\
         Return a JSON object with fields:\n\
         - \"text\": your answer (or \"{abstain}.\")\n\
         - \"citations\": array of {{\"document_id\", \"document_title\", \"page_number\", \"passage_id\", \"quote\"}}\n\
         - \"has_sufficient_context\": true or false\n\
         \n\
         CONTEXT:\n\
         {context}\n\
         \n\
         QUESTION:\n\
         {question}\n",
        abstain = ABSTENTION_PHRASE,
        context = context,
        question = question,
    )
}

/// Instruction appended when the generator's first output failed to parse
pub fn corrective_instruction() -> &'static str {
    "\nYour previous response was not valid JSON matching the required format. \
     Respond again with ONLY a JSON object containing the fields \"text\", \
     \"citations\", and \"has_sufficient_context\".\n"
}
