/// Information about a hosted model.
#[derive(Clone, Debug)]
pub struct ModelInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub context_window: usize,
    pub max_output: u32,
}

pub static GRANITE_3_8B_INSTRUCT: ModelInfo = ModelInfo {
    id: "ibm/granite-3-8b-instruct",
    display_name: "Granite 3 8B Instruct",
    context_window: 131_072,
    max_output: 8_192,
};

pub static GRANITE_3_2B_INSTRUCT: ModelInfo = ModelInfo {
    id: "ibm/granite-3-2b-instruct",
    display_name: "Granite 3 2B Instruct",
    context_window: 131_072,
    max_output: 8_192,
};

pub static LLAMA_3_3_70B_INSTRUCT: ModelInfo = ModelInfo {
    id: "meta-llama/llama-3-3-70b-instruct",
    display_name: "Llama 3.3 70B Instruct",
    context_window: 131_072,
    max_output: 4_096,
};

pub static MISTRAL_LARGE: ModelInfo = ModelInfo {
    id: "mistralai/mistral-large",
    display_name: "Mistral Large",
    context_window: 32_768,
    max_output: 16_384,
};

pub static ALL_MODELS: &[&ModelInfo] = &[
    &GRANITE_3_8B_INSTRUCT,
    &GRANITE_3_2B_INSTRUCT,
    &LLAMA_3_3_70B_INSTRUCT,
    &MISTRAL_LARGE,
];

/// Context window assumed for model ids missing from the catalogue.
pub const FALLBACK_CONTEXT_WINDOW: usize = 8_192;

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    ALL_MODELS.iter().find(|m| m.id == id).copied()
}

pub fn default_model() -> &'static ModelInfo {
    &GRANITE_3_8B_INSTRUCT
}

/// Context window for `id`, falling back for unknown models.
pub fn context_window_for(id: &str) -> usize {
    find_model(id).map_or(FALLBACK_CONTEXT_WINDOW, |m| m.context_window)
}
