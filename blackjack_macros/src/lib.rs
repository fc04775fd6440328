use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{self, Ident};

/// This macro is added before a method of `Simulator` struct in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(PlaceBets)]` will make a method first check
/// if current game phase is `PlaceBets`. If not, the method will return
/// `BlackjackError::WrongPhase`. Both `GamePhase` and `BlackjackError` must be
/// in scope where the method is defined.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn = match syn::parse(item) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let phase: Ident = match syn::parse(attr) {
        Ok(phase) => phase,
        Err(err) => return err.to_compile_error().into(),
    };
    let function_name = ast.sig.ident.to_string();
    let early_return: syn::Stmt = match syn::parse2(phase_guard(&phase, &function_name)) {
        Ok(stmt) => stmt,
        Err(err) => return err.to_compile_error().into(),
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

fn phase_guard(phase: &Ident, function_name: &str) -> TokenStream2 {
    let phase_name = phase.to_string();
    quote! {
        if self.current_game_phase != GamePhase::#phase {
            return Err(BlackjackError::WrongPhase {
                operation: String::from(#function_name),
                phase: String::from(#phase_name),
            });
        }
    }
}
