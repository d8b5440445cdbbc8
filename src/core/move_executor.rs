use crate::core::classify::{classify_parameter, is_tx_context, type_parameter_index, STRING_TAG};
use crate::core::encode::encode_argument;
use crate::domain::model::{
    ExecutionOutcome, MoveCall, NormalizedModule, Parameter, TypeParameter,
};
use crate::domain::ports::{SuiReader, TransactionExecutor};
use crate::utils::error::{DashError, Result};
use crate::utils::validation::is_hex_input;
use std::collections::BTreeMap;

/// Move 函式執行器的表單狀態：套件、模組、函式，以及參數與型別參數列表。
pub struct MoveExecutor<R: SuiReader> {
    reader: R,
    package: String,
    selected_module: String,
    selected_function: String,
    parameters: Vec<Parameter>,
    type_parameters: Vec<TypeParameter>,
    modules: Vec<String>,
    functions: Vec<String>,
    normalized: Option<BTreeMap<String, NormalizedModule>>,
    next_id: u32,
    next_type_id: u32,
}

impl<R: SuiReader> MoveExecutor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            package: String::new(),
            selected_module: String::new(),
            selected_function: String::new(),
            parameters: Vec::new(),
            type_parameters: Vec::new(),
            modules: Vec::new(),
            functions: Vec::new(),
            normalized: None,
            next_id: 0,
            next_type_id: 0,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn selected_module(&self) -> &str {
        &self.selected_module
    }

    pub fn selected_function(&self) -> &str {
        &self.selected_function
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    /// 更新套件地址。非十六進位輸入會被拒絕並保留原值；
    /// 接受時清空已選模組、函式與列表。
    pub fn set_package(&mut self, input: &str) -> bool {
        if !is_hex_input(input) {
            tracing::debug!("Rejected package input: {}", input);
            return false;
        }

        self.package = input.to_string();
        self.selected_module.clear();
        self.selected_function.clear();
        self.modules.clear();
        self.functions.clear();
        self.normalized = None;
        true
    }

    /// 查詢套件中的所有模組；套件為空白時不發出請求。
    pub async fn query_package(&mut self) -> Result<&[String]> {
        if self.package.trim().is_empty() {
            return Ok(&self.modules);
        }

        tracing::info!("📦 Querying package: {}", self.package);
        let modules = self.reader.normalized_modules(&self.package).await?;
        self.modules = modules.keys().cloned().collect();
        tracing::debug!("Package exposes {} modules", self.modules.len());
        self.normalized = Some(modules);
        Ok(&self.modules)
    }

    pub fn select_module(&mut self, module_name: &str) {
        self.selected_module = module_name.to_string();
        self.selected_function.clear();
        self.parameters.clear();
        self.type_parameters.clear();

        self.functions = self
            .normalized
            .as_ref()
            .filter(|_| !module_name.is_empty())
            .and_then(|modules| modules.get(module_name))
            .map(|module| module.exposed_functions.keys().cloned().collect())
            .unwrap_or_default();
    }

    /// 選擇函式並依其宣告自動產生參數欄位。
    ///
    /// 直接宣告為泛型的參數成為型別參數槽位 `T{n}`，`TxContext` 由執行環境注入故略過。
    pub fn select_function(&mut self, function_name: &str) {
        self.selected_function = function_name.to_string();

        let declared = self
            .normalized
            .as_ref()
            .and_then(|modules| modules.get(&self.selected_module))
            .and_then(|module| module.exposed_functions.get(function_name))
            .map(|function| function.parameters.clone())
            .unwrap_or_default();

        let mut slots = Vec::new();
        let mut operating = Vec::new();
        for param in &declared {
            if let Some(index) = type_parameter_index(param) {
                slots.push(index);
            } else if !is_tx_context(param) {
                operating.push(param);
            }
        }

        tracing::debug!(
            "Function {} has {} type parameters and {} operating parameters",
            function_name,
            slots.len(),
            operating.len()
        );

        self.type_parameters = slots
            .iter()
            .enumerate()
            .map(|(offset, index)| TypeParameter {
                id: self.next_type_id + offset as u32,
                name: format!("T{}", index),
                value: String::new(),
            })
            .collect();
        self.next_type_id += slots.len() as u32;

        self.parameters = operating
            .iter()
            .enumerate()
            .map(|(offset, param)| Parameter {
                id: self.next_id + offset as u32,
                value: String::new(),
                type_tag: classify_parameter(param),
            })
            .collect();
        self.next_id += operating.len() as u32;
    }

    pub fn add_parameter(&mut self) -> u32 {
        let id = self.next_id;
        self.parameters.push(Parameter {
            id,
            value: String::new(),
            type_tag: STRING_TAG.to_string(),
        });
        self.next_id += 1;
        id
    }

    pub fn update_parameter_value(&mut self, id: u32, value: &str) -> bool {
        match self.parameters.iter_mut().find(|p| p.id == id) {
            Some(param) => {
                param.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn update_parameter_type(&mut self, id: u32, type_tag: &str) -> bool {
        match self.parameters.iter_mut().find(|p| p.id == id) {
            Some(param) => {
                param.type_tag = type_tag.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_parameter(&mut self, id: u32) {
        self.parameters.retain(|p| p.id != id);
    }

    pub fn add_type_parameter(&mut self) -> u32 {
        let id = self.next_type_id;
        self.type_parameters.push(TypeParameter {
            id,
            name: format!("T{}", id),
            value: String::new(),
        });
        self.next_type_id += 1;
        id
    }

    pub fn update_type_parameter_value(&mut self, id: u32, value: &str) -> bool {
        match self.type_parameters.iter_mut().find(|p| p.id == id) {
            Some(param) => {
                param.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_type_parameter(&mut self, id: u32) {
        self.type_parameters.retain(|p| p.id != id);
    }

    /// 依目前表單內容組出 `package::module::function` 呼叫
    pub fn build_call(&self) -> Result<MoveCall> {
        if self.package.trim().is_empty() {
            return Err(DashError::validation("Move package is required"));
        }
        if self.selected_module.is_empty() {
            return Err(DashError::validation("Module is required"));
        }
        if self.selected_function.is_empty() {
            return Err(DashError::validation("Function is required"));
        }

        let arguments = self
            .parameters
            .iter()
            .map(|param| encode_argument(&param.type_tag, &param.value))
            .collect::<Result<Vec<_>>>()?;

        Ok(MoveCall {
            target: format!(
                "{}::{}::{}",
                self.package, self.selected_module, self.selected_function
            ),
            type_arguments: self
                .type_parameters
                .iter()
                .map(|tp| tp.value.clone())
                .collect(),
            arguments,
        })
    }

    pub async fn execute<E: TransactionExecutor + ?Sized>(
        &self,
        executor: &E,
    ) -> Result<ExecutionOutcome> {
        let call = self.build_call()?;

        tracing::info!(
            target_fn = %call.target,
            type_arguments = ?call.type_arguments,
            arguments = call.arguments.len(),
            "🚀 Executing Move call"
        );

        match executor.sign_and_execute(&call).await {
            Ok(outcome) => {
                match &outcome {
                    ExecutionOutcome::Executed(response) => tracing::info!(
                        "✅ Transaction {} executed (status: {})",
                        response.digest,
                        response.status().unwrap_or("unknown")
                    ),
                    ExecutionOutcome::AwaitingSignature { .. } => {
                        tracing::info!("✍️ Transaction built, awaiting wallet signature")
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("❌ Move call {} failed: {}", call.target, e);
                Err(e)
            }
        }
    }
}
