//! Prompt assembly for the generation backend.
//!
//! The template uses Vicuna-style role markers. The default stop sequences
//! (`USER:` and newline) are matched to it, so the layout here and the
//! generation settings change together or not at all.

/// Fixed instruction placed before the retrieved context.
pub const SYSTEM_INSTRUCTION: &str = "You are an information synthesizer. Your task is to answer the user's question based *only* on the provided context. \
Summarize the information from the context in a friendly, conversational paragraph. \
If the context indicates that no information was found, state that you couldn't find specific details and offer to help with another question. \
Do not use your own knowledge. Do not provide a diagnosis. \
Always conclude your response with a disclaimer reminding the user to consult a healthcare professional.";

const PREAMBLE: &str = "A chat between a curious user and an artificial intelligence assistant.";

/// Build the outbound prompt: preamble, instruction, context, question,
/// then the assistant cue the model continues from.
pub fn assemble_prompt(context: &str, query: &str) -> String {
    format!(
        "{PREAMBLE}\n\
         USER: {SYSTEM_INSTRUCTION}\n\
         \n\
         CONTEXT:\n\
         {context}\n\
         \n\
         User question: {query}\n\
         ASSISTANT:"
    )
}
