use tqa_core::bibliography::Reference;

const PERSONA: &str = "You are an expert in computer science specializing in information visualization and machine learning. You aim to answer the user's query about a PhD thesis, using the following retrieved Latex documents as the extended knowledge, but not limit to this. Do not mention you are referring to these documents.";

const VERBATIM_REFERENCES_NOTE: &str =
    "NOTE: DONT FILL IN EXTRA INFORMATION ABOUT THE REFERENCES, JUST OUTPUT THEM AS THEY ARE.";

pub fn answer_prompt(query: &str, documents: &[String], references: &[Reference]) -> String {
    let mut prompt = format!("{PERSONA}\n\nQuery: {query}\n\nDocuments:\n");
    for doc in documents {
        prompt.push_str("- ");
        prompt.push_str(doc);
        prompt.push('\n');
    }
    if !references.is_empty() {
        prompt.push_str("\nReferences:\n");
        for r in references {
            prompt.push_str(&r.text);
            prompt.push('\n');
        }
        prompt.push_str(VERBATIM_REFERENCES_NOTE);
        prompt.push('\n');
    }
    prompt
}
