use std::io::{ErrorKind, Read, Write};

use rawnet_tensor::{Kernel, Pooler, Shape, Tensor, TensorError};

use super::{RecordError, RecordResult};
use crate::nn::{Convolutional, Dense};

/// An item stored in the little-endian binary record format.
pub trait BinRecord: Sized {
    /// Name used in error messages and logs.
    const NAME: &'static str;

    /// Reads the item from the reader, consuming exactly its record.
    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self>;

    /// Writes the item to the writer.
    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()>;
}

/// The expected class of an image.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub usize);

/// Number of tensor values read at once.
const CHUNK_LEN: usize = 16 * 1024;

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &'static str) -> RecordResult<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => RecordError::UnexpectedEof { what },
        _ => RecordError::Io(err),
    })
}

fn read_bytes<R: Read, const N: usize>(reader: &mut R, what: &'static str) -> RecordResult<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact(reader, &mut buf, what)?;

    Ok(buf)
}

fn read_size<R: Read>(reader: &mut R, what: &'static str) -> RecordResult<usize> {
    let value = u64::from_le_bytes(read_bytes(reader, what)?);

    usize::try_from(value)
        .map_err(|_| RecordError::InvalidMetadata(format!("{what} {value} doesn't fit in memory")))
}

fn read_float<R: Read>(reader: &mut R, what: &'static str) -> RecordResult<f32> {
    Ok(f32::from_le_bytes(read_bytes(reader, what)?))
}

fn read_values<R: Read>(reader: &mut R, shape: Shape) -> RecordResult<Tensor> {
    let len = shape
        .checked_num_elements()
        .ok_or(TensorError::AllocationFailure { shape })?;
    let mut data: Vec<f32> = Vec::new();
    let mut bytes = vec![0u8; 4 * CHUNK_LEN.min(len)];

    while data.len() < len {
        let count = CHUNK_LEN.min(len - data.len());
        let chunk = &mut bytes[..4 * count];
        read_exact(reader, chunk, "tensor values")?;

        data.try_reserve(count)
            .map_err(|_| TensorError::AllocationFailure { shape })?;
        data.extend(
            chunk
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );
    }

    Ok(Tensor::from_data(data, shape)?)
}

fn write_size<W: Write>(writer: &mut W, size: usize) -> RecordResult<()> {
    writer.write_all(&(size as u64).to_le_bytes())?;
    Ok(())
}

fn write_values<W: Write>(writer: &mut W, values: &[f32]) -> RecordResult<()> {
    for value in values {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

impl BinRecord for Tensor {
    const NAME: &'static str = "tensor";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        let m = read_size(reader, "tensor metadata")?;
        let n = read_size(reader, "tensor metadata")?;
        let o = read_size(reader, "tensor metadata")?;

        read_values(reader, Shape::new(m, n, o))
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        for size in self.dims() {
            write_size(writer, size)?;
        }
        write_values(writer, self.as_slice())
    }
}

impl BinRecord for Kernel {
    const NAME: &'static str = "kernel";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        let m = read_size(reader, "kernel metadata")?;
        let n = read_size(reader, "kernel metadata")?;
        let o = read_size(reader, "kernel metadata")?;
        let m_stride = read_size(reader, "kernel metadata")?;
        let n_stride = read_size(reader, "kernel metadata")?;
        let bias = read_float(reader, "kernel bias")?;
        let weights = read_values(reader, Shape::new(m, n, o))?;

        Ok(Kernel::new(weights, [m_stride, n_stride], bias))
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        for size in self.weights.dims().into_iter().chain(self.stride) {
            write_size(writer, size)?;
        }
        writer.write_all(&self.bias.to_le_bytes())?;
        write_values(writer, self.weights.as_slice())
    }
}

impl BinRecord for Pooler {
    const NAME: &'static str = "pooler";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        let m = read_size(reader, "pooler metadata")?;
        let n = read_size(reader, "pooler metadata")?;
        let m_stride = read_size(reader, "pooler metadata")?;
        let n_stride = read_size(reader, "pooler metadata")?;

        Ok(Pooler::new([m, n], [m_stride, n_stride]))
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        for size in self.window.into_iter().chain(self.stride) {
            write_size(writer, size)?;
        }
        Ok(())
    }
}

impl BinRecord for Dense {
    const NAME: &'static str = "dense layer";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        let weights = Tensor::read_record(reader)?;
        let biases = Tensor::read_record(reader)?;

        Ok(Dense::new(weights, biases))
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        self.weights.write_record(writer)?;
        self.biases.write_record(writer)
    }
}

impl BinRecord for Convolutional {
    const NAME: &'static str = "convolutional layer";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        let count = read_size(reader, "kernel count")?;
        let mut kernels = Vec::new();
        kernels.try_reserve_exact(count).map_err(|_| {
            RecordError::InvalidMetadata(format!("kernel count {count} doesn't fit in memory"))
        })?;

        for _ in 0..count {
            kernels.push(Kernel::read_record(reader)?);
        }

        Ok(Convolutional::new(kernels))
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        write_size(writer, self.kernels.len())?;
        for kernel in self.kernels.iter() {
            kernel.write_record(writer)?;
        }
        Ok(())
    }
}

impl BinRecord for Label {
    const NAME: &'static str = "label";

    fn read_record<R: Read>(reader: &mut R) -> RecordResult<Self> {
        read_size(reader, "label").map(Label)
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> RecordResult<()> {
        write_size(writer, self.0)
    }
}
