use crate::tensor::Tensor;
use std::fmt;

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        let mut s = f.debug_struct("Tensor");
        s.field("shape", &guard.shape);
        if guard.data.len() <= 16 {
            s.field("data", &guard.data);
        } else {
            s.field("data", &format_args!("[{} values]", guard.data.len()));
        }
        s.field("requires_grad", &guard.requires_grad);
        if let Some(grad_fn) = guard.grad_fn.as_ref() {
            s.field("grad_fn", &grad_fn.name());
        }
        s.finish()
    }
}
