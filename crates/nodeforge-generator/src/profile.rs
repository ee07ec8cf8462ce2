//! Pattern profiles
//!
//! Per-pattern narrative for the design document and the default utility
//! stubs emitted into `utils.py`.

use nodeforge_model::Pattern;

/// Default utility function a pattern always gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtilityStub {
    /// Function name
    pub name: &'static str,
    /// Parameter list, annotated
    pub params: &'static str,
    /// Return annotation
    pub returns: &'static str,
    /// One-line docstring
    pub doc: &'static str,
    /// What the body must do
    pub guidance: &'static str,
}

/// Narrative and defaults for one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternProfile {
    /// Pattern described
    pub pattern: Pattern,
    /// Design-document paragraph
    pub narrative: &'static str,
    /// Checklist items specific to the pattern
    pub checklist: &'static [&'static str],
    /// Utility stubs
    pub utilities: &'static [UtilityStub],
}

const CALL_LLM: UtilityStub = UtilityStub {
    name: "call_llm",
    params: "prompt: str",
    returns: "str",
    doc: "Send a prompt to the language model and return the text of its reply.",
    guidance: "call_llm: send the prompt to the chosen model provider and return the reply text",
};

const GET_EMBEDDING: UtilityStub = UtilityStub {
    name: "get_embedding",
    params: "text: str",
    returns: "List[float]",
    doc: "Return the embedding vector of a piece of text.",
    guidance: "get_embedding: call the embedding model and return its vector",
};

const SEARCH_INDEX: UtilityStub = UtilityStub {
    name: "search_index",
    params: "query_embedding: List[float], top_k: int = 5",
    returns: "List[Dict[str, Any]]",
    doc: "Return the top_k stored records closest to the query embedding.",
    guidance: "search_index: query the vector index and return the closest records with their scores",
};

const CALL_TOOL: UtilityStub = UtilityStub {
    name: "call_tool",
    params: "name: str, arguments: Dict[str, Any]",
    returns: "Any",
    doc: "Invoke an external tool by name with keyword arguments.",
    guidance: "call_tool: dispatch to the external tool and return its raw result",
};

const SPLIT_CHUNKS: UtilityStub = UtilityStub {
    name: "split_into_chunks",
    params: "text: str, chunk_size: int = 2000",
    returns: "List[str]",
    doc: "Split a long input into chunks small enough to process independently.",
    guidance: "split_into_chunks: cut the input on natural boundaries into pieces of at most chunk_size characters",
};

const PARSE_STRUCTURED: UtilityStub = UtilityStub {
    name: "parse_structured",
    params: "text: str",
    returns: "Dict[str, Any]",
    doc: "Parse a model reply into a dictionary that matches the target schema.",
    guidance: "parse_structured: parse the reply (for example a YAML or JSON block) and validate it against the schema",
};

const SEND_MESSAGE: UtilityStub = UtilityStub {
    name: "send_message",
    params: "recipient: str, message: str",
    returns: "None",
    doc: "Deliver a message from one agent to another.",
    guidance: "send_message: place the message on the recipient agent's queue",
};

static PROFILES: [PatternProfile; 7] = [
    PatternProfile {
        pattern: Pattern::Workflow,
        narrative: "A workflow runs a fixed sequence of steps. Each node hands its result to the next through shared state; branching is the exception rather than the rule.",
        checklist: &["Keep every node focused on one step so the sequence stays easy to reorder."],
        utilities: &[CALL_LLM],
    },
    PatternProfile {
        pattern: Pattern::Tool,
        narrative: "A tool pattern wraps calls to external capabilities. Nodes prepare arguments, invoke the tool through a utility and interpret its result; the tool itself stays behind the utility boundary.",
        checklist: &["Decide how tool failures map to action labels (for example a retry transition)."],
        utilities: &[CALL_LLM, CALL_TOOL],
    },
    PatternProfile {
        pattern: Pattern::Agent,
        narrative: "An agent loops over a decision node: it inspects the context, chooses an action, executes it and returns to the decision until it chooses to finish. The action labels are the agent's vocabulary.",
        checklist: &[
            "Write down the full action space before filling in the decision node.",
            "Give the loop an exit condition so the agent always terminates.",
        ],
        utilities: &[CALL_LLM],
    },
    PatternProfile {
        pattern: Pattern::Rag,
        narrative: "Retrieval-augmented generation answers from stored knowledge. An offline step indexes documents as embeddings; at query time the flow embeds the question, retrieves the closest records and grounds the generated answer in them.",
        checklist: &[
            "Choose the embedding model and the index backend.",
            "Decide how many retrieved records fit into the answer prompt.",
        ],
        utilities: &[CALL_LLM, GET_EMBEDDING, SEARCH_INDEX],
    },
    PatternProfile {
        pattern: Pattern::MapReduce,
        narrative: "Map-reduce splits a large input into independent pieces, processes each piece in a batch node and combines the partial results in a reduce step.",
        checklist: &["Make the map step independent per item so it can run in parallel."],
        utilities: &[CALL_LLM, SPLIT_CHUNKS],
    },
    PatternProfile {
        pattern: Pattern::MultiAgent,
        narrative: "Several agents cooperate, each with its own role and flow, exchanging messages through shared queues. A coordinator decides when the collaboration is done.",
        checklist: &[
            "Define each agent's role and the messages it may send.",
            "Decide which agent ends the collaboration.",
        ],
        utilities: &[CALL_LLM, SEND_MESSAGE],
    },
    PatternProfile {
        pattern: Pattern::StructuredOutput,
        narrative: "Structured output turns free text into typed records. The model is prompted for a fixed format and the reply is parsed and validated against the data models before it is stored.",
        checklist: &["Describe every target field in models.py before writing the prompt."],
        utilities: &[CALL_LLM, PARSE_STRUCTURED],
    },
];

/// Profile of a pattern
#[must_use]
pub fn profile(pattern: Pattern) -> &'static PatternProfile {
    let index = Pattern::ALL.iter().position(|p| *p == pattern).unwrap_or(0);
    &PROFILES[index]
}
