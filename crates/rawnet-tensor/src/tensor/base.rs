use crate::{Shape, TensorError, TensorResult};

/// A dense `(m, n, o)` tensor of `f32`.
///
/// The buffer holds `o` planes one after the other, each plane being `m` rows of `n` columns in
/// row-major order. The buffer length is always `m * n * o`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

/// Allocates a zeroed buffer for the given shape, reporting allocation failures instead of
/// aborting.
pub(crate) fn try_alloc(shape: Shape) -> TensorResult<Vec<f32>> {
    let len = shape
        .checked_num_elements()
        .ok_or(TensorError::AllocationFailure { shape })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| TensorError::AllocationFailure { shape })?;
    data.resize(len, 0.0);

    Ok(data)
}

impl Tensor {
    /// Creates a tensor owning the given buffer.
    ///
    /// Fails with [InvalidShape](TensorError::InvalidShape) when the buffer length isn't
    /// `m * n * o`.
    pub fn from_data<S: Into<Shape>>(data: Vec<f32>, shape: S) -> TensorResult<Self> {
        let shape = shape.into();

        if shape.checked_num_elements() != Some(data.len()) {
            return Err(TensorError::InvalidShape {
                shape,
                reason: "buffer length doesn't match the number of elements",
            });
        }

        Ok(Self { shape, data })
    }

    /// Creates a tensor by copying the given values.
    pub fn from_floats<S: Into<Shape>>(values: &[f32], shape: S) -> TensorResult<Self> {
        let shape = shape.into();
        let mut data = try_alloc(Shape::new(values.len(), 1, 1))?;
        data.copy_from_slice(values);

        Self::from_data(data, shape)
    }

    /// Creates a tensor filled with zeros.
    pub fn zeros<S: Into<Shape>>(shape: S) -> TensorResult<Self> {
        let shape = shape.into();
        let data = try_alloc(shape)?;

        Ok(Self { shape, data })
    }

    /// The shape of the tensor.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The dimensions of the tensor as `[m, n, o]`.
    pub fn dims(&self) -> [usize; 3] {
        self.shape.dims()
    }

    /// The whole buffer, planes one after the other.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The whole buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the tensor, returning its buffer.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Returns the element at `(row, col)` of the given channel plane.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<f32> {
        let Shape { m, n, o } = self.shape;
        if row >= m || col >= n || channel >= o {
            return None;
        }

        self.data.get(channel * m * n + row * n + col).copied()
    }

    /// Returns the buffer of a single channel plane.
    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        if channel >= self.shape.o {
            return None;
        }
        let size = self.shape.plane_size();

        self.data.get(channel * size..(channel + 1) * size)
    }

    /// Iterates over the channel planes in order.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> + '_ {
        let size = self.shape.plane_size();

        (0..self.shape.o).map(move |c| &self.data[c * size..(c + 1) * size])
    }

    /// Iterates over the channel planes in order, mutable.
    pub(crate) fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> + '_ {
        let size = self.shape.plane_size();
        let planes = self.shape.o;
        let mut rest = self.data.as_mut_slice();

        (0..planes).map(move |_| {
            let (plane, tail) = core::mem::take(&mut rest).split_at_mut(size);
            rest = tail;
            plane
        })
    }

    /// Replaces the shape while keeping the buffer untouched.
    pub(crate) fn set_shape(&mut self, shape: Shape) {
        debug_assert_eq!(shape.num_elements(), self.data.len());
        self.shape = shape;
    }

    /// Splits the tensor along the channel dimension into tensors of `sizes[i]` planes each.
    ///
    /// This is the inverse of [combine](crate::combine); the first piece keeps the original
    /// buffer.
    pub fn split_channels(self, sizes: &[usize]) -> TensorResult<Vec<Tensor>> {
        let Shape { m, n, o } = self.shape;

        let total = sizes
            .iter()
            .try_fold(0usize, |acc, size| acc.checked_add(*size));

        if total != Some(o) {
            return Err(TensorError::InvalidShape {
                shape: self.shape,
                reason: "split sizes don't add up to the number of channels",
            });
        }
        let Some((first, others)) = sizes.split_first() else {
            return Err(TensorError::EmptyInput {
                operation: "split_channels",
            });
        };

        let plane = self.shape.plane_size();
        let mut offset = first * plane;
        let mut tensors = Vec::with_capacity(sizes.len());

        for size in others {
            let shape = Shape::new(m, n, *size);
            let mut data = try_alloc(shape)?;
            data.copy_from_slice(&self.data[offset..offset + size * plane]);
            offset += size * plane;
            tensors.push(Tensor { shape, data });
        }

        let mut data = self.data;
        data.truncate(first * plane);
        tensors.insert(
            0,
            Tensor {
                shape: Shape::new(m, n, *first),
                data,
            },
        );

        Ok(tensors)
    }

    pub(crate) fn into_parts(self) -> (Shape, Vec<f32>) {
        (self.shape, self.data)
    }

    pub(crate) fn from_parts(shape: Shape, data: Vec<f32>) -> Self {
        debug_assert_eq!(shape.num_elements(), data.len());
        Self { shape, data }
    }
}
