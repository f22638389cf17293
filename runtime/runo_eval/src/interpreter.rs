//! The program runner.

use tracing::error;

use runo_ir::Program;

use crate::environment::Env;
use crate::errors::EvalError;
use crate::exec::statement;
use crate::host::HostBindings;

/// Runs programs over one root environment.
///
/// Loading a program is synchronous: each statement fully completes, listener
/// registration included, before the next begins. After a successful run the
/// host pushes occurrences into its sinks and the wired pipelines do the
/// rest; the interpreter itself holds no reactive state beyond the root
/// environment's bindings.
pub struct Interpreter {
    root: Env,
}

impl Interpreter {
    /// Build an interpreter whose root environment holds the host's
    /// primitives and drivers.
    pub fn new(host: HostBindings) -> Result<Interpreter, EvalError> {
        Ok(Interpreter {
            root: host.into_root_env()?,
        })
    }

    /// Build an interpreter over an existing root environment.
    pub fn with_env(root: Env) -> Interpreter {
        Interpreter { root }
    }

    /// The root environment.
    pub fn env(&self) -> &Env {
        &self.root
    }

    /// Execute a program, left to right, halting on the first statement that
    /// errors. A failed run leaves earlier statements' bindings and wirings
    /// in place; the host is expected to report the error and terminate.
    pub fn run(&self, program: &Program) -> Result<(), EvalError> {
        for stmt in program {
            if let Err(err) = statement::eval_stmt(&self.root, stmt) {
                error!(error = %err, "program halted");
                return Err(err);
            }
        }
        Ok(())
    }
}
