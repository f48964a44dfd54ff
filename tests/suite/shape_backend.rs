//! Reference backend whose tensors carry only their shape.
//!
//! Result extents follow from the canonical subscripts, which makes the
//! drivers' subscripts and reshapes observable without numeric kernels.

use std::cell::RefCell;
use std::collections::HashMap;

use tensorbackend_einsum::backend::{NumericOutput, SvdRequest, TensorBackend};
use tensorbackend_einsum::{EinsumError, EinsumResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTensor(pub Vec<usize>);

impl ShapeTensor {
    pub fn new(shape: &[usize]) -> Self {
        Self(shape.to_vec())
    }
}

/// Shape backend with every capability.
#[derive(Debug, Default)]
pub struct ShapeBackend {
    pub calls: RefCell<Vec<String>>,
}

impl ShapeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

/// Shape backend that can only contract and reshape.
#[derive(Debug, Default)]
pub struct ContractOnlyBackend;

fn bind(extents: &mut HashMap<char, usize>, term: &str, shape: &[usize]) -> EinsumResult<()> {
    if term.chars().count() != shape.len() {
        return Err(EinsumError::backend(format!("term {term} does not match shape {shape:?}")));
    }
    for (c, &d) in term.chars().zip(shape) {
        if *extents.entry(c).or_insert(d) != d {
            return Err(EinsumError::backend(format!("extent mismatch for '{c}'")));
        }
    }
    Ok(())
}

fn extents_of(extents: &HashMap<char, usize>, term: &str) -> EinsumResult<Vec<usize>> {
    term.chars()
        .map(|c| {
            extents
                .get(&c)
                .copied()
                .ok_or_else(|| EinsumError::backend(format!("unbound index '{c}'")))
        })
        .collect()
}

fn contract_shape(subscripts: &str, operands: &[&ShapeTensor]) -> EinsumResult<ShapeTensor> {
    let (inputs, output) = subscripts
        .split_once("->")
        .ok_or_else(|| EinsumError::backend("missing '->'"))?;
    let terms: Vec<&str> = inputs.split(',').collect();
    if terms.len() != operands.len() {
        return Err(EinsumError::backend("operand count"));
    }
    let mut extents = HashMap::new();
    for (term, operand) in terms.iter().zip(operands) {
        bind(&mut extents, term, &operand.0)?;
    }
    Ok(ShapeTensor(extents_of(&extents, output)?))
}

fn svd_shapes(tensor: &ShapeTensor, request: &SvdRequest<'_>) -> EinsumResult<NumericOutput<ShapeTensor>> {
    let mut extents = HashMap::new();
    bind(&mut extents, request.input, &tensor.0)?;

    let new = request
        .left
        .chars()
        .find(|c| !request.input.contains(*c))
        .ok_or_else(|| EinsumError::backend("no new index"))?;
    let size = |term: &str| -> EinsumResult<usize> {
        let kept: String = term.chars().filter(|&c| c != new).collect();
        Ok(extents_of(&extents, &kept)?.iter().product())
    };
    let full = size(request.left)?.min(size(request.right)?);
    let k = request.rank.map_or(full, |r| r.min(full));
    extents.insert(new, k);

    Ok(NumericOutput::Tuple(vec![
        ShapeTensor(extents_of(&extents, request.left)?),
        ShapeTensor(vec![k]),
        ShapeTensor(extents_of(&extents, request.right)?),
    ]))
}

fn reshape_shape(tensor: ShapeTensor, shape: &[usize]) -> EinsumResult<ShapeTensor> {
    let from: usize = tensor.0.iter().product();
    let to: usize = shape.iter().product();
    if from != to {
        return Err(EinsumError::backend(format!("cannot reshape {:?} to {:?}", tensor.0, shape)));
    }
    Ok(ShapeTensor(shape.to_vec()))
}

impl TensorBackend for ShapeBackend {
    type Tensor = ShapeTensor;

    fn name(&self) -> &'static str {
        "shape"
    }

    fn shape(&self, tensor: &ShapeTensor) -> Vec<usize> {
        tensor.0.clone()
    }

    fn contract(&self, subscripts: &str, operands: &[&ShapeTensor]) -> EinsumResult<NumericOutput<ShapeTensor>> {
        self.record(format!("contract {subscripts}"));
        contract_shape(subscripts, operands).map(NumericOutput::Single)
    }

    fn reshape(&self, tensor: ShapeTensor, shape: &[usize]) -> EinsumResult<ShapeTensor> {
        self.record(format!("reshape {shape:?}"));
        reshape_shape(tensor, shape)
    }

    fn svd(&self, tensor: &ShapeTensor, request: &SvdRequest<'_>) -> EinsumResult<NumericOutput<ShapeTensor>> {
        self.record(format!("svd {}->{},{}", request.input, request.left, request.right));
        svd_shapes(tensor, request)
    }

    fn randomized_svd(
        &self,
        tensor: &ShapeTensor,
        request: &SvdRequest<'_>,
        niter: usize,
        oversamp: usize,
    ) -> EinsumResult<NumericOutput<ShapeTensor>> {
        self.record(format!(
            "randomized_svd {}->{},{} niter={niter} oversamp={oversamp}",
            request.input, request.left, request.right
        ));
        svd_shapes(tensor, request)
    }
}

impl TensorBackend for ContractOnlyBackend {
    type Tensor = ShapeTensor;

    fn name(&self) -> &'static str {
        "contract-only"
    }

    fn shape(&self, tensor: &ShapeTensor) -> Vec<usize> {
        tensor.0.clone()
    }

    fn contract(&self, subscripts: &str, operands: &[&ShapeTensor]) -> EinsumResult<NumericOutput<ShapeTensor>> {
        contract_shape(subscripts, operands).map(NumericOutput::Single)
    }

    fn reshape(&self, tensor: ShapeTensor, shape: &[usize]) -> EinsumResult<ShapeTensor> {
        reshape_shape(tensor, shape)
    }
}
